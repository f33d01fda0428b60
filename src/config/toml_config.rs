use crate::adapters::mailer::{SmtpSettings, SmtpTls};
use crate::core::dispatcher::{
    DispatchPolicy, DispatcherSettings, DEFAULT_CARRIER_TYPE, DEFAULT_SUBJECT,
};
use crate::utils::error::{DispatchError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const MODE_CONFIGURABLE: &str = "configurable";
pub const MODE_FIXED_RECIPIENT: &str = "fixed_recipient";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub carrier: CarrierConfig,
    pub mail: MailConfig,
    pub dispatch: Option<DispatchConfig>,
    #[serde(default)]
    pub shipping_methods: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierConfig {
    pub r#type: Option<String>,
    pub api_base_url: String,
    pub access_token: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub tls: Option<SmtpTls>,
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub mode: Option<String>,
    pub fixed_recipient: Option<String>,
    pub strict_errors: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DispatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DispatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DHL_ACCESS_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DispatchError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn carrier_type(&self) -> &str {
        self.carrier.r#type.as_deref().unwrap_or(DEFAULT_CARRIER_TYPE)
    }

    pub fn carrier_timeout(&self) -> Duration {
        Duration::from_secs(self.carrier.timeout_seconds.unwrap_or(30))
    }

    pub fn mode(&self) -> &str {
        self.dispatch
            .as_ref()
            .and_then(|d| d.mode.as_deref())
            .unwrap_or(MODE_CONFIGURABLE)
    }

    pub fn smtp_settings(&self) -> SmtpSettings {
        SmtpSettings {
            host: self.mail.smtp_host.clone(),
            port: self.mail.smtp_port.unwrap_or(587),
            username: self.mail.username.clone(),
            password: self.mail.password.clone(),
            from: self.mail.from.clone(),
            tls: self.mail.tls.unwrap_or_default(),
        }
    }

    pub fn dispatch_policy(&self) -> Result<DispatchPolicy> {
        let dispatch = self.dispatch.as_ref();
        let policy = match self.mode() {
            MODE_CONFIGURABLE => DispatchPolicy::configurable(),
            MODE_FIXED_RECIPIENT => {
                let fixed = dispatch.and_then(|d| d.fixed_recipient.clone());
                let recipient =
                    validation::validate_required_field("dispatch.fixed_recipient", &fixed)?;
                DispatchPolicy::fixed_recipient(recipient.trim())
            }
            other => {
                return Err(DispatchError::InvalidConfigValueError {
                    field: "dispatch.mode".to_string(),
                    value: other.to_string(),
                    reason: format!(
                        "Valid modes: {}, {}",
                        MODE_CONFIGURABLE, MODE_FIXED_RECIPIENT
                    ),
                })
            }
        };

        Ok(match dispatch.and_then(|d| d.strict_errors) {
            Some(strict) => policy.with_strict_errors(strict),
            None => policy,
        })
    }

    pub fn dispatcher_settings(&self) -> Result<DispatcherSettings> {
        Ok(DispatcherSettings {
            carrier_type: self.carrier_type().to_string(),
            subject: self
                .mail
                .subject
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            policy: self.dispatch_policy()?,
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("carrier.api_base_url", &self.carrier.api_base_url)?;
        validation::validate_non_empty_string("carrier.access_token", &self.carrier.access_token)?;
        validation::validate_non_empty_string("carrier.type", self.carrier_type())?;
        if let Some(timeout) = self.carrier.timeout_seconds {
            validation::validate_positive_number("carrier.timeout_seconds", timeout as usize, 1)?;
        }

        validation::validate_non_empty_string("mail.smtp_host", &self.mail.smtp_host)?;
        if let Some(port) = self.mail.smtp_port {
            validation::validate_positive_number("mail.smtp_port", port as usize, 1)?;
        }
        validation::validate_email_address("mail.from", &self.mail.from)?;

        validation::validate_one_of(
            "dispatch.mode",
            self.mode(),
            &[MODE_CONFIGURABLE, MODE_FIXED_RECIPIENT],
        )?;
        if let Some(recipient) = self.dispatch.as_ref().and_then(|d| d.fixed_recipient.as_ref()) {
            validation::validate_email_address("dispatch.fixed_recipient", recipient)?;
        }
        self.dispatch_policy()?;

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
