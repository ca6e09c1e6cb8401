//! Typed default values for expected headers.
//!
//! A default value lets a required expected header be satisfied without a
//! source column. At materialization time the value is injected into the
//! dataset as a constant column keyed by the header's canonical name.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Date format used when rendering and parsing [`DefaultValue::Date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The kind of value a header accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
        }
    }

    /// Parse raw user input into a value of this kind.
    ///
    /// Booleans accept `true/false`, `yes/no`, `y/n` and `1/0`
    /// (case-insensitive). Dates use ISO 8601 (`YYYY-MM-DD`).
    pub fn parse(&self, raw: &str) -> Result<DefaultValue> {
        let trimmed = raw.trim();
        let invalid = || ModelError::InvalidValue {
            kind: *self,
            value: raw.to_string(),
        };
        match self {
            ValueKind::Text => Ok(DefaultValue::Text(raw.to_string())),
            ValueKind::Integer => trimmed
                .parse::<i64>()
                .map(DefaultValue::Integer)
                .map_err(|_| invalid()),
            ValueKind::Float => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(DefaultValue::Float)
                .ok_or_else(invalid),
            ValueKind::Boolean => match trimmed.to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(DefaultValue::Boolean(true)),
                "false" | "no" | "n" | "0" => Ok(DefaultValue::Boolean(false)),
                _ => Err(invalid()),
            },
            ValueKind::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(DefaultValue::Date)
                .map_err(|_| invalid()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "string" => Ok(ValueKind::Text),
            "integer" | "int" => Ok(ValueKind::Integer),
            "float" | "number" | "decimal" => Ok(ValueKind::Float),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "date" => Ok(ValueKind::Date),
            _ => Err(format!("Unknown value kind: {s}")),
        }
    }
}

/// A typed constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
}

impl DefaultValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            DefaultValue::Text(_) => ValueKind::Text,
            DefaultValue::Integer(_) => ValueKind::Integer,
            DefaultValue::Float(_) => ValueKind::Float,
            DefaultValue::Boolean(_) => ValueKind::Boolean,
            DefaultValue::Date(_) => ValueKind::Date,
        }
    }

    /// Render the value as a CSV cell.
    pub fn to_cell(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Text(v) => write!(f, "{v}"),
            DefaultValue::Integer(v) => write!(f, "{v}"),
            DefaultValue::Float(v) => write!(f, "{v}"),
            DefaultValue::Boolean(v) => write!(f, "{v}"),
            DefaultValue::Date(v) => write!(f, "{}", v.format(DATE_FORMAT)),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Integer(value)
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Boolean(value)
    }
}

impl From<NaiveDate> for DefaultValue {
    fn from(value: NaiveDate) -> Self {
        DefaultValue::Date(value)
    }
}

/// How an expected header obtains a value when no source column is mapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum DefaultValueRule {
    /// A constant known up front. Always yields a value.
    Constant { value: DefaultValue },
    /// The user supplies the value during the session. Yields a value only
    /// once one has been entered.
    UserSupplied { kind: ValueKind },
}

impl DefaultValueRule {
    pub fn constant(value: impl Into<DefaultValue>) -> Self {
        DefaultValueRule::Constant {
            value: value.into(),
        }
    }

    pub fn user_supplied(kind: ValueKind) -> Self {
        DefaultValueRule::UserSupplied { kind }
    }

    /// The kind of value this rule accepts.
    pub fn kind(&self) -> ValueKind {
        match self {
            DefaultValueRule::Constant { value } => value.kind(),
            DefaultValueRule::UserSupplied { kind } => *kind,
        }
    }

    /// The value the rule yields on its own, without user input.
    pub fn value(&self) -> Option<&DefaultValue> {
        match self {
            DefaultValueRule::Constant { value } => Some(value),
            DefaultValueRule::UserSupplied { .. } => None,
        }
    }
}
