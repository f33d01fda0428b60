use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Could not deliver label to {recipient} (carrier responded with status {status})")]
    Delivery { status: u16, recipient: String },

    #[error("Carrier rejected parcel creation with status {status}")]
    ParcelCreation { status: u16 },

    #[error("Carrier did not assign a shipment id to packaging slip {packaging_slip}")]
    ParcelNotCreated { packaging_slip: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail error: {message}")]
    Mail { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DispatchError {
    /// 屬於承運商呼叫的失敗 (建立包裹 / 取得標籤)，由 DispatchPolicy 決定是否中止
    pub fn is_carrier_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::Delivery { .. }
                | DispatchError::ParcelCreation { .. }
                | DispatchError::ParcelNotCreated { .. }
                | DispatchError::Http(_)
        )
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DispatchError::Delivery { .. }
            | DispatchError::ParcelCreation { .. }
            | DispatchError::Http(_) => ErrorSeverity::Medium,
            DispatchError::ParcelNotCreated { .. } | DispatchError::Mail { .. } => {
                ErrorSeverity::High
            }
            DispatchError::Session { .. }
            | DispatchError::IoError(_)
            | DispatchError::SerializationError(_) => ErrorSeverity::High,
            DispatchError::ConfigError { .. }
            | DispatchError::ConfigValidationError { .. }
            | DispatchError::InvalidConfigValueError { .. }
            | DispatchError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DispatchError::Delivery { recipient, .. } => {
                format!("Could not send the barcode to {}", recipient)
            }
            DispatchError::ParcelCreation { .. } | DispatchError::ParcelNotCreated { .. } => {
                "The carrier could not register the parcel".to_string()
            }
            DispatchError::Http(_) => "The carrier API could not be reached".to_string(),
            DispatchError::Mail { message } => format!("Sending the email failed: {}", message),
            DispatchError::ConfigError { .. }
            | DispatchError::ConfigValidationError { .. }
            | DispatchError::InvalidConfigValueError { .. }
            | DispatchError::MissingConfigError { .. } => {
                format!("Configuration problem: {}", self)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.severity() {
            ErrorSeverity::Low => "No action needed",
            ErrorSeverity::Medium => "Check the carrier API status and retry the shipment",
            ErrorSeverity::High => "Check the mail server and session file, then retry",
            ErrorSeverity::Critical => "Fix the configuration file and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
