//! Error types for the spike encoder

use thiserror::Error;

/// Result type for encoder operations
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Errors that can occur while encoding an image into spike trains
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Out-of-range configuration parameter
    #[error("Invalid config {parameter}: {value} (expected {constraint})")]
    InvalidConfig {
        /// Parameter name
        parameter: String,
        /// Offending value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Input grid larger than the configured safe size
    #[error("Unsupported size: {neurons} neurons exceeds limit of {limit}")]
    UnsupportedSize {
        /// Number of neurons requested
        neurons: usize,
        /// Maximum number of neurons allowed
        limit: usize,
    },

    /// Empty, non-rectangular or out-of-range input
    #[error("Malformed input: {reason}")]
    MalformedInput {
        /// Reason the input was rejected
        reason: String,
    },
}

impl EncodeError {
    /// Create an invalid configuration error
    pub fn invalid_config(
        parameter: impl Into<String>,
        value: impl ToString,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            parameter: parameter.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Create an unsupported size error
    pub fn unsupported_size(neurons: usize, limit: usize) -> Self {
        Self::UnsupportedSize { neurons, limit }
    }

    /// Create a malformed input error
    pub fn malformed_input(reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by configuration rather than input data
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }
}
