//! Header reconciliation sessions.
//!
//! A [`ReconcileSession`] owns a [`Dataset`], matches its column headers
//! against a list of expected headers, applies manual corrections as column
//! renames, and finally injects default columns and materializes typed
//! records.
//!
//! The session only talks to the dataset through [`Mutation`]s and
//! [`Dataset::materialize`]; any tabular backend can implement the trait.

pub mod dataset;
pub mod defaults;
pub mod error;
pub mod events;
pub mod session;
pub mod tracker;
pub mod validation;

pub use dataset::{Dataset, DatasetId, FieldProfile, Mutation};
pub use defaults::{apply_defaults, collect_defaults};
pub use error::{DatasetError, Result, SessionError};
pub use events::SessionEvent;
pub use session::{AttachOutcome, ReconcileSession, SessionOptions, SessionState};
pub use tracker::{HeaderTracker, TrackedHeader};
pub use validation::{ReconcileSummary, match_state, summarize, unresolved, validate};
