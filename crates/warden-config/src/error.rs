//! Error types for action values and their entries.

use thiserror::Error;

/// Primary error type for parsing and serialising configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The persisted document could not be turned into a value.
    #[error("unable to parse configuration value: {reason}")]
    Parse {
        /// Human-readable reason reported by the decoder.
        reason: String,
    },
    /// An entry could not be rendered into its structured representation.
    #[error("unable to serialise configuration value")]
    Serialize {
        /// Source serde error.
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Structural violation found in a single action entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    /// Directory action without a target attribute.
    #[error("action '{name}' is missing an attribute name")]
    MissingAttributeName {
        /// Name of the offending entry.
        name: String,
    },
    /// Web-service action without a target URL.
    #[error("action '{name}' is missing a url")]
    MissingUrl {
        /// Name of the offending entry.
        name: String,
    },
    /// Web-service action without an HTTP method.
    #[error("action '{name}' is missing a method")]
    MissingMethod {
        /// Name of the offending entry.
        name: String,
    },
}

impl EntryError {
    /// Debug rendering embedded verbatim in `format error` validation messages.
    #[must_use]
    pub fn debug_str(&self) -> String {
        format!("ERROR_CONFIG_FORMAT ({self})")
    }
}
