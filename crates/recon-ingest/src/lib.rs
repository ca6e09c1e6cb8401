//! CSV ingestion for header reconciliation.
//!
//! Loads CSV content into polars DataFrames with every column read as a
//! string, and exposes the result as a [`CsvDataset`] that a
//! [`recon_session::ReconcileSession`] can rename, extend, and turn into
//! typed records.
//!
//! # Example
//!
//! ```ignore
//! use recon_ingest::CsvDataset;
//! use recon_session::{ReconcileSession, SessionOptions};
//!
//! let dataset = CsvDataset::from_path(Path::new("contacts.csv"))?;
//! let mut session = ReconcileSession::new(expected, SessionOptions::default())?;
//! session.attach(dataset).await?;
//! let records: Option<Vec<Contact>> = session.finalize(None).await?;
//! ```

mod cell;
mod combine;
mod dataset;
mod error;
mod reader;
mod records;
mod transform;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size_with_limit, read_csv_bytes, read_csv_file,
    read_csv_headers, validate_encoding,
};

// === Dataset ===
pub use combine::combine;
pub use dataset::CsvDataset;

// === Transforms ===
pub use transform::{ColumnTransform, FillDefault, SplitColumn};
