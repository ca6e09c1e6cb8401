//! Matching modes and match states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Controls how source headers are automatically matched to expected headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutoMatching {
    /// Case-insensitive equality with an alias.
    /// Example: `First Name` and `first name`.
    Exact,
    /// Close full-string similarity (ratio above 90).
    /// Example: `First Name` and `first nme`.
    #[default]
    Strict,
    /// Strict matches plus strong partial matches (ratio above 60 and
    /// partial ratio above 90).
    /// Example: `First Name` and `first`.
    Lenient,
}

impl AutoMatching {
    pub const ALL: [AutoMatching; 3] = [
        AutoMatching::Exact,
        AutoMatching::Strict,
        AutoMatching::Lenient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AutoMatching::Exact => "Exact",
            AutoMatching::Strict => "Strict",
            AutoMatching::Lenient => "Lenient",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AutoMatching::Exact => {
                "Matches only when the strings are an exact match (case-insensitive): 'First Name' and 'first name'"
            }
            AutoMatching::Strict => {
                "Matches when the strings are a close match: 'First Name' and 'first nme'"
            }
            AutoMatching::Lenient => "Matches even partial strings: 'First Name' and 'first'",
        }
    }
}

impl fmt::Display for AutoMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AutoMatching {
    type Err = ModelError;

    /// Parse a mode name (case-insensitive). Anything else is a
    /// configuration error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EXACT" => Ok(AutoMatching::Exact),
            "STRICT" => Ok(AutoMatching::Strict),
            "LENIENT" => Ok(AutoMatching::Lenient),
            _ => Err(ModelError::UnknownMatchingMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Current state of an expected header. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// Matched to a source header.
    Mapped,
    /// Not matched, but a default value is available.
    ValueProvided,
    /// Required, not matched, and no default value.
    RequiredAndMissing,
    /// Optional, not matched, and no default value.
    Missing,
}

impl MatchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchState::Mapped => "Mapped",
            MatchState::ValueProvided => "Value provided",
            MatchState::RequiredAndMissing => "Required and missing",
            MatchState::Missing => "Missing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MatchState::Mapped => "The expected header has been matched to a csv header.",
            MatchState::ValueProvided => {
                "The expected header has been provided with a default value."
            }
            MatchState::RequiredAndMissing => {
                "The expected header is required and is not mapped and does not have a value provided."
            }
            MatchState::Missing => {
                "The expected header is NOT required and is not mapped and does not have a value provided."
            }
        }
    }

    /// True unless the header blocks materialization.
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, MatchState::RequiredAndMissing)
    }
}

impl fmt::Display for MatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
