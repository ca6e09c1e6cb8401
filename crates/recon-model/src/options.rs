//! Configuration for turning reconciled rows into typed records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Number formatting conventions of the source file.
///
/// Cells are parsed with invariant conventions (`.` decimal, no grouping).
/// Any other culture rewrites numeric-looking cells to the invariant form
/// before records are built, so `1.234,5` under `de-DE` becomes `1234.5`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Culture {
    name: String,
    decimal_separator: char,
    group_separator: Option<char>,
}

impl Culture {
    pub fn invariant() -> Self {
        Self {
            name: "invariant".to_string(),
            decimal_separator: '.',
            group_separator: None,
        }
    }

    pub fn custom(name: impl Into<String>, decimal: char, group: Option<char>) -> Self {
        Self {
            name: name.into(),
            decimal_separator: decimal,
            group_separator: group,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_invariant(&self) -> bool {
        self.decimal_separator == '.' && self.group_separator.is_none()
    }

    /// Rewrite a culture-formatted number to invariant form.
    ///
    /// Returns `None` when the culture is invariant or the cell is not a
    /// number under this culture.
    pub fn normalize_number(&self, raw: &str) -> Option<String> {
        if self.is_invariant() {
            return None;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mut out = String::with_capacity(trimmed.len());
        for ch in trimmed.chars() {
            if Some(ch) == self.group_separator {
                continue;
            }
            if ch == self.decimal_separator {
                out.push('.');
            } else {
                out.push(ch);
            }
        }
        out.parse::<f64>().ok().filter(|v| v.is_finite()).map(|_| out)
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::invariant()
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl FromStr for Culture {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        let culture = match tag.to_lowercase().replace('_', "-").as_str() {
            "" | "invariant" | "c" => Culture::invariant(),
            "en-us" | "en-gb" | "en" => Culture::custom(tag, '.', Some(',')),
            "de-de" | "de" | "nl-nl" | "nl" | "es-es" | "es" | "it-it" | "it" => {
                Culture::custom(tag, ',', Some('.'))
            }
            "fr-fr" | "fr" => Culture::custom(tag, ',', Some('\u{202f}')),
            "de-ch" => Culture::custom(tag, '.', Some('\'')),
            _ => {
                return Err(ModelError::UnknownCulture {
                    value: s.to_string(),
                });
            }
        };
        Ok(culture)
    }
}

/// Whether every expected field must appear as a header before records are
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeaderValidation {
    /// Missing headers are not checked up front.
    #[default]
    Ignore,
    /// Fail when any expected field has no column.
    Strict,
}

/// What to do when a record field has no column in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingFieldPolicy {
    /// Treat the field as an empty cell (`None` for optional fields).
    #[default]
    Ignore,
    /// Leave the field absent and let record construction fail.
    Error,
}

/// Settings passed to the dataset when typed records are materialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterializeConfig {
    pub culture: Culture,
    pub header_validation: HeaderValidation,
    pub missing_fields: MissingFieldPolicy,
}

impl MaterializeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    #[must_use]
    pub fn with_header_validation(mut self, mode: HeaderValidation) -> Self {
        self.header_validation = mode;
        self
    }

    #[must_use]
    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }
}
