use anyhow::Context;
use clap::Parser;
use label_mailer::config::cli::{submitted_data, Command};
use label_mailer::core::PackagingSlip;
use label_mailer::utils::error::ErrorSeverity;
use label_mailer::utils::{logger, validation::Validate};
use label_mailer::{
    CliConfig, DispatchError, DispatchOutcome, EventRouter, FormBuilderEvent, HostEvent,
    HttpCarrierClient, JsonFileSession, PackagingSlipStatusChangedEvent, Routed,
    ShipmentLabelDispatcher, SmtpMailer, StaticShippingMethods, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.json_logs);
    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<DispatchError>() {
            Some(dispatch_error) => {
                tracing::error!(
                    "❌ {} (Severity: {:?})",
                    dispatch_error,
                    dispatch_error.severity()
                );
                eprintln!("❌ {}", dispatch_error.user_friendly_message());
                eprintln!("💡 {}", dispatch_error.recovery_suggestion());

                let exit_code = match dispatch_error.severity() {
                    ErrorSeverity::Low => 0,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                };
                if exit_code > 0 {
                    std::process::exit(exit_code);
                }
                Ok(())
            }
            None => Err(e),
        },
    }
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = TomlConfig::from_file(&cli.config)?;
    config.validate()?;

    let carrier = HttpCarrierClient::new(
        &config.carrier.api_base_url,
        &config.carrier.access_token,
        config.carrier_timeout(),
    )?;
    let mailer = SmtpMailer::new(&config.smtp_settings())?;
    let shipping_methods = StaticShippingMethods::from_config(&config.shipping_methods)?;
    let dispatcher =
        ShipmentLabelDispatcher::new(carrier, mailer, shipping_methods, config.dispatcher_settings()?);
    let router = EventRouter::for_dispatcher(&dispatcher);
    tracing::info!(
        "🚀 Handling {} shipments ({} mode)",
        dispatcher.settings().carrier_type,
        config.mode()
    );
    let mut session = JsonFileSession::open(&cli.session)?;

    match &cli.command {
        Command::Ship {
            slip,
            email,
            format,
        } => {
            let content = std::fs::read_to_string(slip)
                .with_context(|| format!("reading packaging slip {}", slip.display()))?;
            let packaging_slip: PackagingSlip = serde_json::from_str(&content)
                .with_context(|| format!("parsing packaging slip {}", slip.display()))?;
            let had_shipment_id = packaging_slip.carrier_shipment_id.is_some();

            let mut event = PackagingSlipStatusChangedEvent::new(
                packaging_slip,
                submitted_data(email.as_deref(), *format),
            );
            let result = router
                .dispatch(&dispatcher, HostEvent::StatusShipped(&mut event), &mut session)
                .await;

            // 即使取標籤失敗，已建立的包裹 id 也要寫回
            if !had_shipment_id && event.packaging_slip.carrier_shipment_id.is_some() {
                std::fs::write(slip, serde_json::to_string_pretty(&event.packaging_slip)?)?;
                tracing::info!("💾 Shipment id written back to {}", slip.display());
            }

            match result? {
                Routed::Shipped(DispatchOutcome::Delivered {
                    recipient, format, ..
                }) => println!("✅ {} label sent to {}", format, recipient),
                Routed::Shipped(DispatchOutcome::Dropped { recipient, reason }) => {
                    println!("⚠️ Label for {} was not delivered: {}", recipient, reason)
                }
                Routed::Shipped(DispatchOutcome::Skipped(reason)) => {
                    println!("⏭️ Nothing sent: {:?}", reason)
                }
                Routed::FormExtended | Routed::Ignored => {}
            }
        }
        Command::Form => {
            let mut event = FormBuilderEvent::default();
            router
                .dispatch(&dispatcher, HostEvent::FormBuilder(&mut event), &mut session)
                .await?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }

    Ok(())
}
