//! Typed records from an all-string DataFrame.

use polars::prelude::*;
use recon_model::{HeaderValidation, MaterializeConfig, MissingFieldPolicy};
use recon_session::{DatasetError, FieldProfile};
use serde::de::DeserializeOwned;

use crate::cell::deserialize_row;

/// Deserialize one `T` per row.
///
/// Each column feeds the field `profile` binds it to. When the profile
/// lists fields, columns bound to other fields are left out. Cells read
/// into numeric fields follow the configured culture; every other cell is
/// passed through as written.
pub(crate) fn materialize<T: DeserializeOwned>(
    df: &DataFrame,
    config: &MaterializeConfig,
    profile: &FieldProfile,
) -> Result<Vec<T>, DatasetError> {
    let mut bound: Vec<(&str, &StringChunked)> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let field = profile.field_for(column.name().as_str());
        if profile.has_fields() && !profile.fields().iter().any(|f| f == field) {
            continue;
        }
        if bound.iter().any(|(existing, _)| *existing == field) {
            tracing::warn!(field, column = %column.name(), "field already bound, column skipped");
            continue;
        }
        bound.push((field, column.str().map_err(DatasetError::backend)?));
    }

    let missing: Vec<&str> = profile
        .fields()
        .iter()
        .map(String::as_str)
        .filter(|field| !bound.iter().any(|(bound_field, _)| bound_field == field))
        .collect();
    if config.header_validation == HeaderValidation::Strict
        && let Some(field) = missing.first()
    {
        return Err(DatasetError::MissingHeader {
            field: field.to_string(),
        });
    }
    let fill: &[&str] = match config.missing_fields {
        MissingFieldPolicy::Ignore => missing.as_slice(),
        MissingFieldPolicy::Error => &[],
    };

    let culture = &config.culture;
    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cells = bound
            .iter()
            .map(|(field, cells)| (*field, cells.get(row).unwrap_or("")))
            .chain(fill.iter().map(|field| (*field, "")));
        let value = deserialize_row::<T, _>(cells, culture).map_err(|err| DatasetError::Record {
            row,
            message: err.to_string(),
        })?;
        records.push(value);
    }
    Ok(records)
}
