//! Error types for fasttrack.

use thiserror::Error;

/// Result type alias for fasttrack operations.
pub type Result<T> = std::result::Result<T, GrowthError>;

/// Error types for the growth simulator.
#[derive(Error, Debug)]
pub enum GrowthError {
    /// Invalid parameter value.
    #[error("Invalid parameter `{field}`: {message}")]
    InvalidParameter { field: String, message: String },

    /// Empty data error.
    #[error("Empty data provided for {context}")]
    EmptyData { context: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// Subscriber installation failed.
    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

impl GrowthError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an empty data error.
    pub fn empty_data(context: impl Into<String>) -> Self {
        Self::EmptyData {
            context: context.into(),
        }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether the error was raised while validating input, before any round ran.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::EmptyData { .. } | Self::InvalidConfig { .. }
        )
    }
}

#[cfg(feature = "python")]
impl From<GrowthError> for pyo3::PyErr {
    fn from(err: GrowthError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
