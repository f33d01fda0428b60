use crate::core::LabelFormat;
use crate::domain::model::SubmittedData;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "label-mailer")]
#[command(about = "Fetch carrier shipping labels and mail them to the packing station")]
pub struct CliConfig {
    #[arg(long, default_value = "label-mailer.toml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".label-mailer-session.json", help = "Operator session file")]
    pub session: PathBuf,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Zpl,
    Pdf,
}

impl From<FormatArg> for LabelFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Zpl => LabelFormat::Zpl,
            FormatArg::Pdf => LabelFormat::Pdf,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Mark a packaging slip as shipped and mail its label
    Ship {
        #[arg(long, help = "Packaging slip JSON file; updated in place with the shipment id")]
        slip: PathBuf,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, value_enum, ignore_case = true)]
        format: Option<FormatArg>,
    },
    /// Print the extra form fields, pre-filled from the session
    Form,
}

/// Builds the submitted form values the shipped handler reads.
pub fn submitted_data(email: Option<&str>, format: Option<FormatArg>) -> SubmittedData {
    let mut data = SubmittedData::new();
    if let Some(email) = email {
        data.insert("email".to_string(), serde_json::Value::from(email));
    }
    if let Some(format) = format {
        data.insert(
            "email_format".to_string(),
            serde_json::Value::from(LabelFormat::from(format).as_str()),
        );
    }
    data
}
