//! Error types for snapshot reads, password scoring and rule evaluation.

use thiserror::Error;

/// Errors raised while reading a configuration snapshot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Stored value does not match the syntax requested by the reader.
    #[error("setting '{key}' expected {expected} but found {found}")]
    TypeMismatch {
        /// Setting key.
        key: String,
        /// Syntax the reader asked for.
        expected: &'static str,
        /// JSON kind actually stored.
        found: &'static str,
    },
    /// Profile identifier is not defined for the category.
    #[error("unknown {category} profile '{profile}'")]
    UnknownProfile {
        /// Profile category key.
        category: &'static str,
        /// Requested profile identifier.
        profile: String,
    },
    /// Setting is not defined in the requested scope (profile-scoped read without a profile, or
    /// a global setting read with one).
    #[error("setting '{key}' is not defined {scope}")]
    UnknownSetting {
        /// Setting key.
        key: String,
        /// Scope description used in the message.
        scope: &'static str,
    },
    /// Action setting holds payloads that do not decode into action entries.
    #[error("setting '{key}' holds invalid actions: {reason}")]
    InvalidAction {
        /// Setting key.
        key: String,
        /// Decoder message.
        reason: String,
    },
    /// Snapshot document could not be decoded.
    #[error("invalid snapshot document: {reason}")]
    Document {
        /// Decoder message.
        reason: String,
    },
}

/// Convenience alias for snapshot reads.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors raised by a password strength scorer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password scoring failed: {reason}")]
pub struct ScoreError {
    /// Failure description.
    pub reason: String,
}

impl ScoreError {
    /// Build an error from any displayable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that abort a single health rule.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Snapshot read failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Password scorer failed.
    #[error(transparent)]
    Scorer(#[from] ScoreError),
    /// A stored value cannot be interpreted by the rule.
    #[error("invalid value at {location}: {reason}")]
    InvalidValue {
        /// Human location of the offending setting.
        location: String,
        /// Failure description.
        reason: String,
    },
}

/// Convenience alias for rule evaluation.
pub type RuleResult<T> = Result<T, RuleError>;
