//! Default-value injection for unmapped expected headers.

use std::collections::BTreeMap;

use recon_model::{DefaultValue, ExpectedHeader};

use crate::dataset::{Dataset, Mutation};
use crate::error::DatasetError;
use crate::tracker::HeaderTracker;

/// Column name to fill value for every unmapped expected header that has a
/// value.
pub fn collect_defaults(
    expected: &[ExpectedHeader],
    tracker: &HeaderTracker,
) -> BTreeMap<String, DefaultValue> {
    expected
        .iter()
        .filter(|h| !tracker.is_mapped(h.name()))
        .filter_map(|h| {
            h.resolved_value()
                .map(|value| (h.name().to_string(), value.clone()))
        })
        .collect()
}

/// Add every collected default as a column in one mutation.
///
/// Returns the names of the added columns; nothing is sent when there are
/// none.
pub async fn apply_defaults<D: Dataset>(
    dataset: &mut D,
    expected: &[ExpectedHeader],
    tracker: &HeaderTracker,
) -> Result<Vec<String>, DatasetError> {
    let columns = collect_defaults(expected, tracker);
    if columns.is_empty() {
        return Ok(Vec::new());
    }
    let names: Vec<String> = columns.keys().cloned().collect();
    tracing::debug!(columns = names.len(), "injecting default columns");
    dataset.mutate(Mutation::AddColumns(columns)).await?;
    Ok(names)
}
