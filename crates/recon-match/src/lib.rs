//! Header matching strategies.
//!
//! Decides whether a source header corresponds to one of the expected
//! headers that are still unmatched, under an [`AutoMatching`] mode:
//!
//! - **Exact**: case-insensitive equality with any alias
//! - **Strict**: full-string similarity ratio above 90
//! - **Lenient**: Strict, or ratio above 60 with a partial ratio above 90
//!
//! Candidates are tried in the order the caller supplies them and, within a
//! candidate, alias by alias. The first satisfying pair wins, so results are
//! stable across runs no matter how close competing scores are. Excluding
//! already-matched headers is the caller's job.
//!
//! # Example
//!
//! ```
//! use recon_match::HeaderMatcher;
//! use recon_model::{AutoMatching, ExpectedHeader};
//!
//! let expected = vec![
//!     ExpectedHeader::new("FirstName").with_aliases(["First Name"]),
//!     ExpectedHeader::new("Email"),
//! ];
//! let matcher = HeaderMatcher::new(AutoMatching::Lenient);
//! let hit = matcher.find_match("first", &expected).map(ExpectedHeader::name);
//! assert_eq!(hit, Some("FirstName"));
//! ```

mod matcher;
mod score;

pub use matcher::{HeaderMatcher, MatchScore, Suggestion};
pub use recon_model::AutoMatching;
pub use score::{
    LENIENT_PARTIAL_THRESHOLD, LENIENT_RATIO_THRESHOLD, STRICT_RATIO_THRESHOLD, partial_ratio,
    ratio,
};
