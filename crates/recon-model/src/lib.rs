//! Data model for reconciling arbitrary CSV headers against a fixed set of
//! expected headers.
//!
//! - [`ExpectedHeader`]: one target column, its aliases, whether it is
//!   required, and an optional default-value rule
//! - [`AutoMatching`]: how aggressively source headers are auto-matched
//! - [`MatchState`]: the derived four-way status of an expected header
//! - [`MaterializeConfig`]: explicit settings for building typed records
//! - [`RecordSchema`]: the field list of a target record type

pub mod enums;
pub mod error;
pub mod header;
pub mod options;
pub mod schema;
pub mod value;

pub use enums::{AutoMatching, MatchState};
pub use error::{ModelError, Result};
pub use header::{ExpectedHeader, validate_headers, same_member_set};
pub use options::{Culture, HeaderValidation, MaterializeConfig, MissingFieldPolicy};
pub use schema::{RecordSchema, expected_headers_from_schema};
pub use value::{DefaultValue, DefaultValueRule, ValueKind};
