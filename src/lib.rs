pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::TomlConfig;

pub use crate::adapters::{
    carrier::HttpCarrierClient, mailer::SmtpMailer, session::JsonFileSession,
    session::MemorySession, shipping::StaticShippingMethods,
};
pub use crate::core::dispatcher::{
    DispatchOutcome, DispatchPolicy, DispatcherSettings, ShipmentLabelDispatcher, SkipReason,
};
pub use crate::core::events::{
    EventRouter, FormBuilderEvent, HostEvent, PackagingSlipStatusChangedEvent, Routed,
};
pub use crate::utils::error::{DispatchError, Result};
