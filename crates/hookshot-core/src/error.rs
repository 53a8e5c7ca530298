//! Error types for controller configuration.

use std::fmt;

/// Result type for configuration checks.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors reported when a controller configuration is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A tunable lies outside its accepted range.
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },
    /// A tunable is NaN or infinite.
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A tunable that must be strictly positive is zero or negative.
    NotPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} = {value} is outside [{min}, {max}]"),
            ConfigError::NonFinite { field } => write!(f, "{field} must be finite"),
            ConfigError::NotPositive { field, value } => {
                write!(f, "{field} = {value} must be greater than zero")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
