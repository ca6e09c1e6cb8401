use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised while building or configuring the header model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// An expected header was declared without a canonical name.
    #[error("expected header name must not be empty")]
    EmptyName,

    /// Two expected headers share a canonical name.
    #[error("duplicate expected header: {name}")]
    DuplicateName { name: String },

    /// Matching mode string is not one of Exact, Strict, Lenient.
    #[error("unknown matching mode: {value}")]
    UnknownMatchingMode { value: String },

    /// Culture string is not a supported locale tag.
    #[error("unknown culture: {value}")]
    UnknownCulture { value: String },

    /// A value could not be parsed as the kind the header accepts.
    #[error("invalid {kind} value '{value}'")]
    InvalidValue { kind: ValueKind, value: String },

    /// A value was assigned to a header that has no default-value rule.
    #[error("expected header '{name}' does not accept a default value")]
    ValueNotAccepted { name: String },

    /// A value of the wrong kind was assigned to a header.
    #[error("expected header '{name}' accepts {expected} values, got {actual}")]
    ValueKindMismatch {
        name: String,
        expected: ValueKind,
        actual: ValueKind,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
