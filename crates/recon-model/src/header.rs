//! Expected header definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::value::{DefaultValue, DefaultValueRule};

/// A target column the downstream consumer requires.
///
/// The canonical name is the rename target for a matched source column and
/// the field key used when records are materialized. It never changes after
/// creation. The alias list always starts with the canonical name and holds
/// no case-insensitive duplicates.
///
/// The manually entered value is session state: it is cleared whenever the
/// header gets mapped to a source column and whenever the session resets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExpectedHeader")]
pub struct ExpectedHeader {
    name: String,
    aliases: Vec<String>,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<DefaultValueRule>,
    #[serde(skip)]
    value: Option<DefaultValue>,
}

/// Wire form of [`ExpectedHeader`], validated on conversion.
#[derive(Deserialize)]
struct RawExpectedHeader {
    name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default: Option<DefaultValueRule>,
}

impl TryFrom<RawExpectedHeader> for ExpectedHeader {
    type Error = ModelError;

    fn try_from(raw: RawExpectedHeader) -> Result<Self> {
        if raw.name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        let mut header = ExpectedHeader::new(raw.name).with_aliases(raw.aliases);
        header.required = raw.required;
        header.default = raw.default;
        Ok(header)
    }
}

impl ExpectedHeader {
    /// Create an optional header whose only alias is its canonical name.
    ///
    /// Names are checked when a list is handed to a session, see
    /// [`validate_headers`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            aliases: vec![name.clone()],
            name,
            required: false,
            default: None,
            value: None,
        }
    }

    /// Append aliases, skipping blanks and case-insensitive duplicates.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: BTreeSet<String> = self.aliases.iter().map(|a| a.to_lowercase()).collect();
        for alias in aliases {
            let alias = alias.into();
            if alias.trim().is_empty() {
                continue;
            }
            if seen.insert(alias.to_lowercase()) {
                self.aliases.push(alias);
            }
        }
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_default(mut self, rule: DefaultValueRule) -> Self {
        self.default = Some(rule);
        self
    }

    /// Canonical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strings considered during matching, canonical name first.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default_rule(&self) -> Option<&DefaultValueRule> {
        self.default.as_ref()
    }

    /// The manually entered value, if any.
    pub fn value(&self) -> Option<&DefaultValue> {
        self.value.as_ref()
    }

    /// True when the header has a default-value rule and can take a value.
    pub fn accepts_value(&self) -> bool {
        self.default.is_some()
    }

    /// The value that would be injected for this header: the manual value
    /// when one was entered, otherwise whatever the rule yields on its own.
    pub fn resolved_value(&self) -> Option<&DefaultValue> {
        let rule = self.default.as_ref()?;
        self.value.as_ref().or_else(|| rule.value())
    }

    pub fn has_value(&self) -> bool {
        self.resolved_value().is_some()
    }

    /// Set or clear the manual value.
    ///
    /// Fails when the header has no default-value rule or the value kind
    /// does not match the rule.
    pub fn set_value(&mut self, value: Option<DefaultValue>) -> Result<()> {
        let Some(value) = value else {
            self.value = None;
            return Ok(());
        };
        let Some(rule) = &self.default else {
            return Err(ModelError::ValueNotAccepted {
                name: self.name.clone(),
            });
        };
        if rule.kind() != value.kind() {
            return Err(ModelError::ValueKindMismatch {
                name: self.name.clone(),
                expected: rule.kind(),
                actual: value.kind(),
            });
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

/// Check that every header has a name and no two share one.
pub fn validate_headers(headers: &[ExpectedHeader]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for header in headers {
        if header.name().trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        if !seen.insert(header.name()) {
            return Err(ModelError::DuplicateName {
                name: header.name().to_string(),
            });
        }
    }
    Ok(())
}

/// True when both lists hold the same canonical names.
///
/// Order and every other field are ignored, so a reordered or re-created
/// list with the same members compares equal.
pub fn same_member_set(current: &[ExpectedHeader], incoming: &[ExpectedHeader]) -> bool {
    if current.len() != incoming.len() {
        return false;
    }
    current
        .iter()
        .all(|existing| incoming.iter().any(|h| h.name() == existing.name()))
}
