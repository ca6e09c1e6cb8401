//! Single-column transforms applied to a loaded dataset.

use std::fmt;

use polars::prelude::*;
use recon_model::DefaultValue;

use crate::error::{IngestError, Result};

/// A change to one column of a DataFrame.
pub trait ColumnTransform {
    /// Apply to `df`, returning the number of rows changed.
    fn apply(&self, df: &mut DataFrame) -> Result<usize>;
}

/// Split a column's cells on a delimiter into new columns.
///
/// Part `i` goes to target column `i`. Rows with fewer parts get nulls in
/// the remaining targets; parts beyond the last target are dropped.
#[derive(Debug, Clone)]
pub struct SplitColumn {
    column: String,
    targets: Vec<String>,
    delimiter: String,
    remove_source: bool,
    keep_empty_parts: bool,
}

impl SplitColumn {
    pub fn new<I, S>(column: impl Into<String>, targets: I, delimiter: impl Into<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets: Vec<String> = targets.into_iter().map(Into::into).collect();
        let delimiter = delimiter.into();
        if targets.is_empty() {
            return Err(IngestError::InvalidTransform {
                message: "split needs at least one target column".to_string(),
            });
        }
        if delimiter.trim().is_empty() {
            return Err(IngestError::InvalidTransform {
                message: "split delimiter must not be blank".to_string(),
            });
        }
        Ok(Self {
            column: column.into(),
            targets,
            delimiter,
            remove_source: false,
            keep_empty_parts: false,
        })
    }

    /// Drop the source column after splitting.
    #[must_use]
    pub fn remove_source(mut self, remove: bool) -> Self {
        self.remove_source = remove;
        self
    }

    /// Keep empty parts between adjacent delimiters instead of skipping
    /// them.
    #[must_use]
    pub fn keep_empty_parts(mut self, keep: bool) -> Self {
        self.keep_empty_parts = keep;
        self
    }
}

impl ColumnTransform for SplitColumn {
    fn apply(&self, df: &mut DataFrame) -> Result<usize> {
        if df.get_column_index(&self.column).is_none() {
            return Err(IngestError::ColumnNotFound {
                column: self.column.clone(),
            });
        }

        let mut parts: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(df.height()); self.targets.len()];
        let mut changed = 0;
        {
            let cells = df.column(&self.column)?.str()?;
            for cell in cells.into_iter() {
                let pieces: Vec<&str> = cell
                    .map(|value| {
                        value
                            .split(self.delimiter.as_str())
                            .filter(|piece| self.keep_empty_parts || !piece.is_empty())
                            .collect()
                    })
                    .unwrap_or_default();
                if !pieces.is_empty() {
                    changed += 1;
                }
                for (idx, target) in parts.iter_mut().enumerate() {
                    target.push(pieces.get(idx).map(|piece| (*piece).to_string()));
                }
            }
        }

        for (name, values) in self.targets.iter().zip(parts) {
            df.with_column(Column::new(name.as_str().into(), values))?;
        }
        if self.remove_source && !self.targets.contains(&self.column) {
            df.drop_in_place(&self.column)?;
        }
        tracing::debug!(
            column = %self.column,
            targets = self.targets.len(),
            rows = changed,
            "column split"
        );
        Ok(changed)
    }
}

type CellPredicate = Box<dyn Fn(Option<&str>) -> bool + Send + Sync>;

/// Replace cells of a column with a constant.
///
/// By default only null and blank cells are replaced.
pub struct FillDefault {
    column: String,
    value: DefaultValue,
    predicate: CellPredicate,
}

impl FillDefault {
    pub fn new(column: impl Into<String>, value: impl Into<DefaultValue>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            predicate: Box::new(|cell: Option<&str>| cell.is_none_or(|v| v.trim().is_empty())),
        }
    }

    /// Replace the cells for which `predicate` returns true.
    #[must_use]
    pub fn when(mut self, predicate: impl Fn(Option<&str>) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    /// Replace every cell.
    #[must_use]
    pub fn always(self) -> Self {
        self.when(|_| true)
    }
}

impl fmt::Debug for FillDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillDefault")
            .field("column", &self.column)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl ColumnTransform for FillDefault {
    fn apply(&self, df: &mut DataFrame) -> Result<usize> {
        if df.get_column_index(&self.column).is_none() {
            return Err(IngestError::ColumnNotFound {
                column: self.column.clone(),
            });
        }
        let fill = self.value.to_cell();
        let mut changed = 0;
        let values: Vec<Option<String>> = df
            .column(&self.column)?
            .str()?
            .into_iter()
            .map(|cell| {
                if (self.predicate)(cell) {
                    changed += 1;
                    Some(fill.clone())
                } else {
                    cell.map(str::to_string)
                }
            })
            .collect();
        df.with_column(Column::new(self.column.as_str().into(), values))?;
        tracing::debug!(column = %self.column, rows = changed, "default filled");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> DataFrame {
        DataFrame::new(vec![Column::new(
            "full name".into(),
            vec![Some("Ada|Lovelace"), Some("Plato"), None],
        )])
        .unwrap()
    }

    #[test]
    fn split_fills_targets_in_order() {
        let mut df = names();
        let split = SplitColumn::new("full name", ["first", "last"], "|")
            .unwrap()
            .remove_source(true);
        assert_eq!(split.apply(&mut df).unwrap(), 2);

        let first = df.column("first").unwrap().str().unwrap();
        let last = df.column("last").unwrap().str().unwrap();
        assert_eq!(first.get(0), Some("Ada"));
        assert_eq!(last.get(0), Some("Lovelace"));
        assert_eq!(last.get(1), None);
        assert_eq!(first.get(2), None);
        assert!(df.column("full name").is_err());
    }

    #[test]
    fn split_rejects_bad_arguments() {
        assert!(SplitColumn::new("a", Vec::<String>::new(), ",").is_err());
        assert!(SplitColumn::new("a", ["b"], " ").is_err());
    }

    #[test]
    fn fill_replaces_blank_cells_by_default() {
        let mut df = names();
        let changed = FillDefault::new("full name", "unknown").apply(&mut df).unwrap();
        assert_eq!(changed, 1);
        let cells = df.column("full name").unwrap().str().unwrap();
        assert_eq!(cells.get(0), Some("Ada|Lovelace"));
        assert_eq!(cells.get(2), Some("unknown"));
    }

    #[test]
    fn fill_always_replaces_everything() {
        let mut df = names();
        let changed = FillDefault::new("full name", 7_i64)
            .always()
            .apply(&mut df)
            .unwrap();
        assert_eq!(changed, 3);
        assert_eq!(df.column("full name").unwrap().str().unwrap().get(1), Some("7"));
    }
}
