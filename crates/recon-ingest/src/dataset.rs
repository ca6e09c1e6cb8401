//! DataFrame-backed dataset.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use recon_model::{DefaultValue, MaterializeConfig};
use recon_session::{Dataset, DatasetError, DatasetId, FieldProfile, Mutation};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::reader::{MAX_CSV_FILE_SIZE, read_csv_bytes, read_csv_file};
use crate::records;
use crate::transform::ColumnTransform;

/// CSV content held as a DataFrame of string columns.
///
/// Clones share the [`DatasetId`], so re-attaching a clone to a session is
/// a no-op. Loading new content always yields a new id.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    id: DatasetId,
    name: String,
    frame: Option<DataFrame>,
}

impl CsvDataset {
    /// Dataset with no data loaded.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            id: DatasetId::new(),
            name: name.into(),
            frame: None,
        }
    }

    /// Wrap `df`, casting every column to string.
    pub fn from_dataframe(name: impl Into<String>, df: DataFrame) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(|column| column.cast(&DataType::String))
            .collect::<PolarsResult<Vec<Column>>>()?;
        Ok(Self {
            id: DatasetId::new(),
            name: name.into(),
            frame: Some(DataFrame::new(columns)?),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let frame = read_csv_bytes(&name, bytes)?;
        Ok(Self::loaded(name, frame))
    }

    pub fn from_str(name: impl Into<String>, content: &str) -> Result<Self> {
        Self::from_bytes(name, content.as_bytes().to_vec())
    }

    /// Load a file no larger than [`MAX_CSV_FILE_SIZE`].
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_path_with_limit(path, MAX_CSV_FILE_SIZE)
    }

    pub fn from_path_with_limit(path: &Path, max_size: u64) -> Result<Self> {
        let frame = read_csv_file(path, max_size)?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::loaded(name, frame))
    }

    fn loaded(name: String, frame: Option<DataFrame>) -> Self {
        let dataset = Self {
            id: DatasetId::new(),
            name,
            frame,
        };
        if let Some(df) = &dataset.frame {
            debug!(
                name = %dataset.name,
                dataset = %dataset.id,
                rows = df.height(),
                columns = df.width(),
                "CSV loaded"
            );
        }
        dataset
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.frame.is_some()
    }

    pub fn height(&self) -> usize {
        self.frame.as_ref().map_or(0, DataFrame::height)
    }

    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.frame.as_ref()
    }

    pub fn into_dataframe(self) -> Option<DataFrame> {
        self.frame
    }

    /// Cell at `row` of `column`; `None` for nulls and unknown positions.
    pub fn cell(&self, column: &str, row: usize) -> Option<&str> {
        let df = self.frame.as_ref()?;
        df.column(column).ok()?.str().ok()?.get(row)
    }

    /// Write the current content as CSV with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let Some(df) = &self.frame else {
            return Err(IngestError::DataFrame {
                message: format!("{} has no data to write", self.name),
            });
        };
        let mut file = File::create(path).map_err(|e| IngestError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        debug!(path = %path.display(), rows = df.height(), "CSV written");
        Ok(())
    }

    /// Run a column transform, returning the number of rows it changed.
    pub fn transform(&mut self, transform: &impl ColumnTransform) -> Result<usize> {
        let df = self.frame.as_mut().ok_or_else(|| IngestError::DataFrame {
            message: format!("{} has no data loaded", self.name),
        })?;
        transform.apply(df)
    }

    /// Apply `mutation` synchronously.
    pub fn apply_mutation(&mut self, mutation: Mutation) -> std::result::Result<(), DatasetError> {
        let df = self.frame.as_mut().ok_or(DatasetError::NotLoaded)?;
        match mutation {
            Mutation::RenameColumn { from, to } => rename_column(df, &from, &to),
            Mutation::AddColumns(columns) => add_columns(df, columns),
            Mutation::RemoveColumns(columns) => remove_columns(df, &columns),
        }
    }
}

impl Dataset for CsvDataset {
    fn id(&self) -> DatasetId {
        self.id
    }

    fn headers(&self) -> Option<Vec<String>> {
        self.frame.as_ref().map(|df| {
            df.get_column_names()
                .into_iter()
                .map(|name| name.to_string())
                .collect()
        })
    }

    async fn mutate(&mut self, mutation: Mutation) -> std::result::Result<(), DatasetError> {
        self.apply_mutation(mutation)
    }

    fn materialize<T: DeserializeOwned>(
        &self,
        config: &MaterializeConfig,
        profile: &FieldProfile,
    ) -> std::result::Result<Vec<T>, DatasetError> {
        let df = self.frame.as_ref().ok_or(DatasetError::NotLoaded)?;
        records::materialize(df, config, profile)
    }
}

/// Rename in place, keeping the column's position.
fn rename_column(df: &mut DataFrame, from: &str, to: &str) -> std::result::Result<(), DatasetError> {
    if from == to {
        return Ok(());
    }
    if df.get_column_index(to).is_some() {
        return Err(DatasetError::DuplicateColumn {
            column: to.to_string(),
        });
    }
    if df.get_column_index(from).is_none() {
        return Err(DatasetError::ColumnNotFound {
            column: from.to_string(),
        });
    }
    df.rename(from, to.into()).map_err(DatasetError::backend)?;
    debug!(from, to, "column renamed");
    Ok(())
}

/// Add constant columns; a column with the same name is replaced.
fn add_columns(
    df: &mut DataFrame,
    columns: BTreeMap<String, DefaultValue>,
) -> std::result::Result<(), DatasetError> {
    let height = df.height();
    for (name, value) in columns {
        let cell = value.to_cell();
        df.with_column(Column::new(name.as_str().into(), vec![cell.as_str(); height]))
            .map_err(DatasetError::backend)?;
        debug!(column = %name, value = %cell, "constant column added");
    }
    Ok(())
}

fn remove_columns(df: &mut DataFrame, columns: &[String]) -> std::result::Result<(), DatasetError> {
    for name in columns {
        if df.get_column_index(name).is_none() {
            return Err(DatasetError::ColumnNotFound {
                column: name.clone(),
            });
        }
        df.drop_in_place(name).map_err(DatasetError::backend)?;
        debug!(column = %name, "column removed");
    }
    Ok(())
}
