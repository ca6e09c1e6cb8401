//! In-memory dataset that records every mutation it receives.

#![allow(dead_code)]

use recon_model::{HeaderValidation, MaterializeConfig, MissingFieldPolicy};
use recon_session::{Dataset, DatasetError, DatasetId, FieldProfile, Mutation};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct MemoryDataset {
    id: DatasetId,
    columns: Option<Vec<(String, Vec<String>)>>,
    rows: usize,
    fail_adds: bool,
    pub log: Vec<Mutation>,
}

impl MemoryDataset {
    pub fn new(headers: &[&str], rows: &[&[&str]]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells = rows.iter().map(|row| row[idx].to_string()).collect();
                (name.to_string(), cells)
            })
            .collect();
        Self {
            id: DatasetId::new(),
            columns: Some(columns),
            rows: rows.len(),
            fail_adds: false,
            log: Vec::new(),
        }
    }

    pub fn headers_only(headers: &[&str]) -> Self {
        Self::new(headers, &[])
    }

    pub fn unloaded() -> Self {
        Self {
            id: DatasetId::new(),
            columns: None,
            rows: 0,
            fail_adds: false,
            log: Vec::new(),
        }
    }

    pub fn failing_adds(mut self) -> Self {
        self.fail_adds = true;
        self
    }

    pub fn names(&self) -> Vec<String> {
        self.headers().unwrap_or_default()
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns
            .as_ref()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cells)| cells.as_slice())
    }

    fn columns_mut(&mut self) -> Result<&mut Vec<(String, Vec<String>)>, DatasetError> {
        self.columns.as_mut().ok_or(DatasetError::NotLoaded)
    }
}

impl Dataset for MemoryDataset {
    fn id(&self) -> DatasetId {
        self.id
    }

    fn headers(&self) -> Option<Vec<String>> {
        self.columns
            .as_ref()
            .map(|cols| cols.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn mutate(&mut self, mutation: Mutation) -> Result<(), DatasetError> {
        self.log.push(mutation.clone());
        let rows = self.rows;
        let fail_adds = self.fail_adds;
        let columns = self.columns_mut()?;
        match mutation {
            Mutation::RenameColumn { from, to } => {
                if from == to {
                    return Ok(());
                }
                if columns.iter().any(|(n, _)| *n == to) {
                    return Err(DatasetError::DuplicateColumn { column: to });
                }
                let column = columns
                    .iter_mut()
                    .find(|(n, _)| *n == from)
                    .ok_or(DatasetError::ColumnNotFound { column: from })?;
                column.0 = to;
            }
            Mutation::AddColumns(values) => {
                if fail_adds {
                    return Err(DatasetError::backend(std::io::Error::other("disk full")));
                }
                for (name, value) in values {
                    columns.retain(|(n, _)| *n != name);
                    columns.push((name, vec![value.to_cell(); rows]));
                }
            }
            Mutation::RemoveColumns(names) => columns.retain(|(n, _)| !names.contains(n)),
        }
        Ok(())
    }

    fn materialize<T: DeserializeOwned>(
        &self,
        config: &MaterializeConfig,
        profile: &FieldProfile,
    ) -> Result<Vec<T>, DatasetError> {
        let columns = self.columns.as_ref().ok_or(DatasetError::NotLoaded)?;
        if config.header_validation == HeaderValidation::Strict {
            for field in profile.fields() {
                if !columns.iter().any(|(n, _)| profile.field_for(n) == field.as_str()) {
                    return Err(DatasetError::MissingHeader {
                        field: field.clone(),
                    });
                }
            }
        }
        (0..self.rows)
            .map(|row| {
                let mut object = Map::new();
                for (name, cells) in columns {
                    object.insert(
                        profile.field_for(name).to_string(),
                        Value::String(cells[row].clone()),
                    );
                }
                if config.missing_fields == MissingFieldPolicy::Ignore {
                    for field in profile.fields() {
                        object.entry(field.clone()).or_insert(Value::Null);
                    }
                }
                serde_json::from_value(Value::Object(object)).map_err(|err| {
                    DatasetError::Record {
                        row,
                        message: err.to_string(),
                    }
                })
            })
            .collect()
    }
}
