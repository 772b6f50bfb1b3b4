use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine-wide error taxonomy.
///
/// `Network` on the primary item list, `Validation`, `Duplicate` and
/// `AuthRequired` reach the user; everything else is recovered locally and
/// only logged.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DocentError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {message}")]
    Duplicate { message: String },

    #[error("Analysis parse error: {message}")]
    Parse { message: String },

    #[error("Authentication required: {message}")]
    AuthRequired { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DocentError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::AuthRequired {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Duplicate { .. } => "DUPLICATE_ENTRY",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::AuthRequired { .. } => "AUTH_REQUIRED",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is surfaced to the user rather than recovered
    /// behind a log line. Network errors are user-visible only where the
    /// caller decides they are (the primary item list); lookups degrade to
    /// empty lists instead.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Validation { .. }
                | Self::Duplicate { .. }
                | Self::AuthRequired { .. }
        )
    }
}

pub type DocentResult<T> = Result<T, DocentError>;

// Conversion from common error types
impl From<reqwest::Error> for DocentError {
    fn from(error: reqwest::Error) -> Self {
        Self::network(error.to_string())
    }
}

impl From<serde_json::Error> for DocentError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(error.to_string())
    }
}
