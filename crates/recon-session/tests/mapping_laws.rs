//! The mapping stays one-to-one and in step with the live column names under
//! any sequence of manual corrections.

mod common;

use std::collections::BTreeSet;

use common::MemoryDataset;
use proptest::prelude::*;
use recon_model::{AutoMatching, ExpectedHeader};
use recon_session::{ReconcileSession, SessionOptions};

const SOURCE: [&str; 5] = ["first name", "email", "phone", "notes", "city"];
const EXPECTED: [&str; 4] = ["FirstName", "Email", "Phone", "Country"];

#[derive(Debug, Clone)]
enum Edit {
    Remap(usize, usize),
    Unmap(usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0..SOURCE.len(), 0..EXPECTED.len()).prop_map(|(o, e)| Edit::Remap(o, e)),
        (0..SOURCE.len()).prop_map(Edit::Unmap),
    ]
}

fn expected_headers() -> Vec<ExpectedHeader> {
    vec![
        ExpectedHeader::new("FirstName")
            .with_aliases(["First Name"])
            .required(true),
        ExpectedHeader::new("Email"),
        ExpectedHeader::new("Phone"),
        ExpectedHeader::new("Country"),
    ]
}

fn check_consistency(session: &ReconcileSession<MemoryDataset>) -> Result<(), TestCaseError> {
    let mut claimed = BTreeSet::new();
    for (original, expected) in session.original_to_expected() {
        if let Some(expected) = expected {
            prop_assert!(
                claimed.insert(expected),
                "{expected} claimed twice, second time by {original}"
            );
        }
    }

    let live = session
        .dataset()
        .map(MemoryDataset::names)
        .unwrap_or_default();
    let tracked: Vec<&str> = session
        .original_to_current()
        .map(|(_, current)| current)
        .collect();
    prop_assert_eq!(live, tracked);

    for entry in session.tracker().entries() {
        let name = entry.expected().unwrap_or(entry.original());
        prop_assert_eq!(entry.current(), name);
    }
    Ok(())
}

proptest! {
    #[test]
    fn edits_keep_mapping_one_to_one(
        mode in prop::sample::select(AutoMatching::ALL.to_vec()),
        edits in prop::collection::vec(edit(), 0..24),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let options = SessionOptions {
                matching: mode,
                ..SessionOptions::default()
            };
            let mut session = ReconcileSession::new(expected_headers(), options).unwrap();
            let _ = session
                .attach(MemoryDataset::headers_only(&SOURCE))
                .await
                .unwrap();
            check_consistency(&session)?;

            for edit in edits {
                let result = match edit {
                    Edit::Remap(o, e) => session.remap(SOURCE[o], EXPECTED[e]).await,
                    Edit::Unmap(o) => session.unmap(SOURCE[o]).await,
                };
                if let Err(err) = result {
                    prop_assert!(err.is_recoverable(), "{err}");
                }
                check_consistency(&session)?;
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
