//! Validity and per-header match state.

use recon_model::{ExpectedHeader, MatchState};
use serde::Serialize;

use crate::tracker::HeaderTracker;

/// True when every required expected header is mapped or has a value.
pub fn validate(expected: &[ExpectedHeader], tracker: &HeaderTracker) -> bool {
    expected
        .iter()
        .filter(|h| h.is_required())
        .all(|h| h.has_value() || tracker.is_mapped(h.name()))
}

/// Display state of one expected header.
pub fn match_state(header: &ExpectedHeader, tracker: &HeaderTracker) -> MatchState {
    if tracker.is_mapped(header.name()) {
        MatchState::Mapped
    } else if header.accepts_value() && header.has_value() {
        MatchState::ValueProvided
    } else if header.is_required() {
        MatchState::RequiredAndMissing
    } else {
        MatchState::Missing
    }
}

/// Required expected headers that are neither mapped nor valued.
pub fn unresolved<'a>(
    expected: &'a [ExpectedHeader],
    tracker: &HeaderTracker,
) -> Vec<&'a ExpectedHeader> {
    expected
        .iter()
        .filter(|h| match_state(h, tracker) == MatchState::RequiredAndMissing)
        .collect()
}

/// Counts over a session's expected headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReconcileSummary {
    pub total_expected: usize,
    pub mapped: usize,
    pub value_provided: usize,
    pub required_total: usize,
    pub required_satisfied: usize,
    pub source_columns: usize,
    pub unmapped_columns: usize,
}

impl ReconcileSummary {
    pub fn is_valid(&self) -> bool {
        self.required_satisfied == self.required_total
    }
}

pub fn summarize(expected: &[ExpectedHeader], tracker: &HeaderTracker) -> ReconcileSummary {
    let mut summary = ReconcileSummary {
        total_expected: expected.len(),
        source_columns: tracker.len(),
        unmapped_columns: tracker.len() - tracker.mapped_count(),
        ..ReconcileSummary::default()
    };
    for header in expected {
        let state = match_state(header, tracker);
        match state {
            MatchState::Mapped => summary.mapped += 1,
            MatchState::ValueProvided => summary.value_provided += 1,
            MatchState::RequiredAndMissing | MatchState::Missing => {}
        }
        if header.is_required() {
            summary.required_total += 1;
            if state.is_satisfied() {
                summary.required_satisfied += 1;
            }
        }
    }
    summary
}
