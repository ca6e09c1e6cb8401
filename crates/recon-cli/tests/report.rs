//! Report rows and tables built from a live session.

use recon_cli::report::{
    match_rows, match_table, modes_table, summary_line, unmapped_columns, unmapped_table,
};
use recon_ingest::CsvDataset;
use recon_model::{DefaultValue, DefaultValueRule, ExpectedHeader, ValueKind};
use recon_session::{ReconcileSession, SessionOptions};

fn expected_headers() -> Vec<ExpectedHeader> {
    vec![
        ExpectedHeader::new("FirstName")
            .with_aliases(["First Name"])
            .required(true),
        ExpectedHeader::new("Email").with_aliases(["E-mail"]),
        ExpectedHeader::new("Age")
            .required(true)
            .with_default(DefaultValueRule::user_supplied(ValueKind::Integer)),
        ExpectedHeader::new("Country").with_default(DefaultValueRule::constant("US")),
    ]
}

async fn reconciled_session() -> ReconcileSession<CsvDataset> {
    let dataset =
        CsvDataset::from_str("contacts.csv", "first name,e-mail,notes\nAda,ada@example.com,x\n")
            .unwrap();
    let mut session = ReconcileSession::new(expected_headers(), SessionOptions::default()).unwrap();
    assert!(session.attach(dataset).await.unwrap().is_reconciled());
    session
        .set_value("Age", Some(DefaultValue::Integer(36)))
        .unwrap();
    session
}

#[tokio::test]
async fn match_rows_follow_display_order() {
    let session = reconciled_session().await;
    let rows = match_rows(&session);
    insta::assert_json_snapshot!(rows);
}

#[tokio::test]
async fn unmapped_columns_carry_a_suggestion() {
    let session = reconciled_session().await;
    let unmapped = unmapped_columns(&session);
    assert_eq!(unmapped.len(), 1);
    assert_eq!(unmapped[0].column, "notes");
    // Only unmapped headers are offered.
    let suggestion = unmapped[0].suggestion.as_deref().unwrap();
    assert!(suggestion == "Age" || suggestion == "Country");
    assert!(unmapped[0].score.as_deref().unwrap().contains("ratio"));

    let rendered = unmapped_table(&unmapped).to_string();
    assert!(rendered.contains("notes"));
}

#[tokio::test]
async fn match_table_lists_every_header() {
    let session = reconciled_session().await;
    let rendered = match_table(&match_rows(&session)).to_string();
    for name in ["FirstName", "Email", "Age", "Country", "first name", "Value provided"] {
        assert!(rendered.contains(name), "missing {name} in\n{rendered}");
    }
}

#[tokio::test]
async fn summary_counts_headers_and_columns_separately() {
    let session = reconciled_session().await;
    assert_eq!(
        summary_line(&session.summary()),
        "Required: 2/2  Mapped: 2/4  Values: 2  Unmapped columns: 1/3"
    );
}

#[test]
fn modes_table_marks_the_default() {
    let rendered = modes_table().to_string();
    assert!(rendered.contains("Strict (default)"));
    assert!(rendered.contains("Lenient"));
    assert!(rendered.contains("Exact"));
}
