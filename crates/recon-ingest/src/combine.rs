//! Vertical concatenation of datasets.

use recon_session::Dataset;

use crate::dataset::CsvDataset;
use crate::error::{IngestError, Result};

/// Stack the rows of `datasets` in order.
///
/// Every loaded dataset must have the same set of headers as the first;
/// columns are aligned by name. Datasets without data are skipped. The
/// result is a new dataset with a fresh id.
pub fn combine(name: impl Into<String>, datasets: Vec<CsvDataset>) -> Result<CsvDataset> {
    let name = name.into();
    let mut loaded = datasets.into_iter().filter(CsvDataset::is_loaded);
    let Some(first) = loaded.next() else {
        return Ok(CsvDataset::empty(name));
    };
    let headers = first.headers().unwrap_or_default();
    let mut sorted_headers = headers.clone();
    sorted_headers.sort();
    let Some(mut frame) = first.into_dataframe() else {
        return Ok(CsvDataset::empty(name));
    };

    let mut parts = 1;
    for dataset in loaded {
        let mut found = dataset.headers().unwrap_or_default();
        found.sort();
        if found != sorted_headers {
            return Err(IngestError::HeaderMismatch {
                name: dataset.name().to_string(),
                expected: headers,
                found: dataset.headers().unwrap_or_default(),
            });
        }
        let Some(other) = dataset.into_dataframe() else {
            continue;
        };
        let aligned = other.select(headers.iter().map(String::as_str))?;
        frame.vstack_mut(&aligned)?;
        parts += 1;
    }
    tracing::debug!(name = %name, parts, rows = frame.height(), "datasets combined");
    CsvDataset::from_dataframe(name, frame)
}
