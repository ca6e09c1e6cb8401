//! Error types for reconciliation sessions and their dataset collaborator.

use recon_model::ModelError;
use thiserror::Error;

/// Failures reported by a [`Dataset`](crate::Dataset) implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// No column with this name.
    #[error("column not found: {column}")]
    ColumnNotFound { column: String },

    /// A rename or add would create a second column with this name.
    #[error("column already exists: {column}")]
    DuplicateColumn { column: String },

    /// The dataset has no data loaded.
    #[error("dataset has no data loaded")]
    NotLoaded,

    /// Strict header validation found a field without a column.
    #[error("no column for field '{field}'")]
    MissingHeader { field: String },

    /// A row could not be turned into a record.
    #[error("failed to build record from row {row}: {message}")]
    Record { row: usize, message: String },

    /// Error from the storage backend.
    #[error("dataset backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DatasetError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Errors from session commands.
///
/// A [`SessionError::Dataset`] raised by a mutation leaves the dataset and
/// the session's view of it possibly out of step. Treat it as fatal for the
/// current dataset and attach again.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The original header is not part of the attached dataset.
    #[error("unknown original header: {header}")]
    UnknownOriginalHeader { header: String },

    /// No expected header has this canonical name.
    #[error("unknown expected header: {header}")]
    UnknownExpectedHeader { header: String },

    /// The rename would give two columns the same name. Nothing was changed.
    #[error("cannot rename '{column}' to '{target}': another column already has that name")]
    NameConflict { column: String, target: String },

    /// A dataset mutation failed.
    #[error("dataset mutation failed: {0}")]
    Dataset(#[from] DatasetError),

    /// Invalid expected headers or values.
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

impl SessionError {
    /// True when the session is unchanged and the user can correct the
    /// input and retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Dataset(_))
    }

    /// Get a user-friendly suggestion for fixing this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnknownOriginalHeader { .. } => {
                Some("Use a header name exactly as it appeared in the uploaded file.")
            }
            Self::UnknownExpectedHeader { .. } => {
                Some("Use the canonical name of one of the expected headers.")
            }
            Self::NameConflict { .. } => {
                Some("Rename or unmap the column that already uses the target name first.")
            }
            Self::Dataset(_) => Some("Reset and attach the file again."),
            Self::Model(_) => None,
        }
    }
}
