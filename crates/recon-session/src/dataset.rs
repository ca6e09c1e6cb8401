//! The tabular collaborator a session reconciles.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use recon_model::{DefaultValue, MaterializeConfig};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::DatasetError;

/// Identity of a loaded dataset.
///
/// Attaching a dataset whose id matches the attached one is a no-op, so an
/// id must stay the same for as long as the underlying data does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(Uuid);

impl DatasetId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DatasetId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A change to the dataset's columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Rename a column in place. Renaming a column to its own name is a
    /// no-op.
    RenameColumn { from: String, to: String },
    /// Add one column per entry, every cell filled with the entry's value.
    /// A column that already has the name is replaced.
    AddColumns(BTreeMap<String, DefaultValue>),
    /// Drop columns by name.
    RemoveColumns(Vec<String>),
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RenameColumn { from, to } => write!(f, "rename '{from}' -> '{to}'"),
            Self::AddColumns(columns) => {
                let names: Vec<&str> = columns.keys().map(String::as_str).collect();
                write!(f, "add columns [{}]", names.join(", "))
            }
            Self::RemoveColumns(columns) => write!(f, "remove columns [{}]", columns.join(", ")),
        }
    }
}

/// Column-to-field binding used when records are materialized.
///
/// A column named like a field feeds that field. `with_rename` binds a
/// column under a different field name. `fields` lists the fields a record
/// needs; it drives strict header validation and missing-field filling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProfile {
    renames: BTreeMap<String, String>,
    fields: Vec<String>,
}

impl FieldProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile whose fields are `fields`, with no renames.
    pub fn for_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().with_fields(fields)
    }

    #[must_use]
    pub fn with_rename(mut self, column: impl Into<String>, field: impl Into<String>) -> Self {
        self.renames.insert(column.into(), field.into());
        self
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        self
    }

    /// Field fed by `column`.
    pub fn field_for<'a>(&'a self, column: &'a str) -> &'a str {
        self.renames.get(column).map_or(column, String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Column-oriented data a session can rename, extend, and read back as
/// typed records.
///
/// Mutations are asynchronous; the session awaits each one before issuing
/// the next.
pub trait Dataset {
    fn id(&self) -> DatasetId;

    /// Current column names in order, or `None` when no data is loaded.
    fn headers(&self) -> Option<Vec<String>>;

    fn mutate(
        &mut self,
        mutation: Mutation,
    ) -> impl Future<Output = Result<(), DatasetError>> + Send;

    /// Build one `T` per row.
    fn materialize<T: DeserializeOwned>(
        &self,
        config: &MaterializeConfig,
        profile: &FieldProfile,
    ) -> Result<Vec<T>, DatasetError>;
}
