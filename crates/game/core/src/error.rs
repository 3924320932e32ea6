//! Error types surfaced by rad-core.
//!
//! The core never aborts on bad input. Out-of-range source parameters are
//! clamped, missing lookups are `None`, and configuration problems are
//! reported as [`ConfigError`] values next to the default that replaced them.
//! Callers decide how to log them.

use thiserror::Error;

/// A configuration value that could not be used as written.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid effect threshold `{0}`: expected a non-negative integer")]
    InvalidThreshold(String),

    #[error("invalid value `{value}` for `{field}`, using default `{default}`")]
    InvalidValue {
        field: &'static str,
        value: String,
        default: String,
    },

    #[error("section `{section}` could not be parsed ({reason}), using defaults")]
    InvalidSection { section: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid_value(
        field: &'static str,
        value: impl ToString,
        default: impl ToString,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
            default: default.to_string(),
        }
    }
}
