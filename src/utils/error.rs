use crate::domain::model::ProviderId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixError {
    #[error("No location providers are enabled")]
    NoProvidersEnabled,

    #[error("Provider {provider} disabled")]
    ProviderDisabled { provider: ProviderId },

    #[error("No fix received within {millis} ms")]
    Timeout { millis: u64 },

    #[error("Location authorization missing: {message}")]
    AuthorizationMissing { message: String },

    #[error("Provider {provider} failed: {message}")]
    ProviderFault {
        provider: ProviderId,
        message: String,
    },

    #[error("Fix request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Provider,
    Timing,
    Permission,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FixError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FixError::NoProvidersEnabled
            | FixError::ProviderDisabled { .. }
            | FixError::ProviderFault { .. } => ErrorCategory::Provider,
            FixError::Timeout { .. } | FixError::Cancelled => ErrorCategory::Timing,
            FixError::AuthorizationMissing { .. } => ErrorCategory::Permission,
            FixError::ConfigError { .. }
            | FixError::ConfigValidationError { .. }
            | FixError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FixError::IoError(_) | FixError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FixError::Cancelled => ErrorSeverity::Low,
            FixError::Timeout { .. }
            | FixError::ProviderDisabled { .. }
            | FixError::ProviderFault { .. } => ErrorSeverity::Medium,
            FixError::NoProvidersEnabled
            | FixError::AuthorizationMissing { .. }
            | FixError::ConfigError { .. }
            | FixError::ConfigValidationError { .. }
            | FixError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            FixError::IoError(_) | FixError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FixError::NoProvidersEnabled => {
                "Enable at least one location provider (GPS or network) and retry".to_string()
            }
            FixError::ProviderDisabled { provider } => {
                format!("Re-enable the '{}' provider and retry", provider)
            }
            FixError::Timeout { .. } => {
                "Move to an area with better reception or raise timeout_millis".to_string()
            }
            FixError::AuthorizationMissing { .. } => {
                "Grant fine or coarse location access to the application".to_string()
            }
            FixError::ProviderFault { .. } => "Retry the request; the provider reported a fault".to_string(),
            FixError::Cancelled => "No action needed".to_string(),
            FixError::ConfigError { .. }
            | FixError::ConfigValidationError { .. }
            | FixError::InvalidConfigValueError { .. } => {
                "Check the configuration values and file syntax".to_string()
            }
            FixError::IoError(_) => "Check file paths and permissions".to_string(),
            FixError::SerializationError(_) => "Report this as a bug".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Provider => format!("Location providers unavailable: {}", self),
            ErrorCategory::Timing => format!("Location request did not complete: {}", self),
            ErrorCategory::Permission => format!("Location access denied: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, FixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_disabled_names_provider() {
        let err = FixError::ProviderDisabled {
            provider: ProviderId::gps(),
        };
        assert_eq!(err.to_string(), "Provider gps disabled");
        assert_eq!(err.category(), ErrorCategory::Provider);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(FixError::Cancelled.severity() < FixError::Timeout { millis: 1 }.severity());
        assert_eq!(FixError::NoProvidersEnabled.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_user_friendly_message_mentions_cause() {
        let err = FixError::AuthorizationMissing {
            message: "fine location not granted".to_string(),
        };
        let message = err.user_friendly_message();
        assert!(message.starts_with("Location access denied"));
        assert!(message.contains("fine location not granted"));
    }
}
