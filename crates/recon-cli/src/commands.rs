//! Command implementations.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use recon_ingest::{CsvDataset, MAX_CSV_FILE_SIZE, read_csv_headers};
use recon_model::{
    AutoMatching, Culture, DefaultValueRule, ExpectedHeader, HeaderValidation, MaterializeConfig,
};
use recon_session::{AttachOutcome, ReconcileSession, ReconcileSummary, SessionOptions};
use tracing::{Instrument, debug, info, info_span};

use crate::report::{MatchRow, UnmappedColumn, match_rows, unmapped_columns};

/// One output record: expected header name to cell text.
pub type Record = BTreeMap<String, String>;

/// Inputs of the `reconcile` command.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub csv: PathBuf,
    /// JSON file with the expected headers.
    pub expected: PathBuf,
    pub matching: AutoMatching,
    pub culture: Culture,
    /// Refuse to build records when an expected header has no column.
    pub strict_headers: bool,
    pub max_file_size: u64,
    /// Manual `original -> expected` corrections, applied after unmaps.
    pub maps: Vec<(String, String)>,
    pub unmaps: Vec<String>,
    /// Raw `expected -> value` entries, parsed by the header's value kind.
    pub defaults: Vec<(String, String)>,
    /// Where to write the reconciled CSV.
    pub output: Option<PathBuf>,
    /// Where to write records as JSON lines.
    pub records: Option<PathBuf>,
}

impl ReconcileRequest {
    pub fn new(csv: impl Into<PathBuf>, expected: impl Into<PathBuf>) -> Self {
        Self {
            csv: csv.into(),
            expected: expected.into(),
            matching: AutoMatching::default(),
            culture: Culture::invariant(),
            strict_headers: false,
            max_file_size: MAX_CSV_FILE_SIZE,
            maps: Vec::new(),
            unmaps: Vec::new(),
            defaults: Vec::new(),
            output: None,
            records: None,
        }
    }
}

/// What a `reconcile` run produced.
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    pub rows: Vec<MatchRow>,
    pub unmapped: Vec<UnmappedColumn>,
    pub summary: ReconcileSummary,
    pub valid: bool,
    /// Number of records built, `None` when the session stayed invalid.
    pub records: Option<usize>,
}

/// Load, match, apply corrections, and build records when the headers are
/// complete.
pub async fn run_reconcile(request: &ReconcileRequest) -> Result<ReconcileResult> {
    let span = info_span!("reconcile", csv = %request.csv.display());
    reconcile(request).instrument(span).await
}

async fn reconcile(request: &ReconcileRequest) -> Result<ReconcileResult> {
    let expected = load_expected_headers(&request.expected)?;
    let dataset = CsvDataset::from_path_with_limit(&request.csv, request.max_file_size)
        .with_context(|| format!("failed to load {}", request.csv.display()))?;

    let header_validation = if request.strict_headers {
        HeaderValidation::Strict
    } else {
        HeaderValidation::Ignore
    };
    let options = SessionOptions {
        matching: request.matching,
        frozen: false,
        materialize: MaterializeConfig::new()
            .with_culture(request.culture.clone())
            .with_header_validation(header_validation),
    };
    let mut session =
        ReconcileSession::new(expected, options).context("invalid expected headers")?;

    match session.attach(dataset).await? {
        AttachOutcome::Reconciled { matched } => {
            info!(matched, mode = %request.matching, "automatic matching done");
        }
        AttachOutcome::NoHeaders(_) => bail!("{} has no header row", request.csv.display()),
        AttachOutcome::Unchanged(_) => {}
    }

    for original in &request.unmaps {
        session
            .unmap(original)
            .await
            .with_context(|| format!("cannot unmap '{original}'"))?;
    }
    for (original, expected) in &request.maps {
        session
            .remap(original, expected)
            .await
            .with_context(|| format!("cannot map '{original}' to '{expected}'"))?;
    }
    for (name, raw) in &request.defaults {
        apply_default(&mut session, name, raw)?;
    }

    let valid = session.is_valid();
    let mut built = None;
    if valid {
        let Some(records) = session.finalize::<Record>(None).await? else {
            bail!(
                "records could not be built from {}",
                request.csv.display()
            );
        };
        if let Some(path) = &request.records {
            write_records(path, &records)?;
        }
        if let Some(path) = &request.output
            && let Some(dataset) = session.dataset()
        {
            dataset
                .write_csv(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        built = Some(records.len());
    }

    Ok(ReconcileResult {
        rows: match_rows(&session),
        unmapped: unmapped_columns(&session),
        summary: session.summary(),
        valid,
        records: built,
    })
}

/// Pretty JSON listing one expected header per column of `csv`.
pub fn run_expected(csv: &Path, max_file_size: u64, required: bool) -> Result<String> {
    let headers = read_csv_headers(csv, max_file_size)
        .with_context(|| format!("failed to load {}", csv.display()))?;
    if headers.is_empty() {
        bail!("{} has no header row", csv.display());
    }
    let expected: Vec<ExpectedHeader> = headers
        .into_iter()
        .map(|name| ExpectedHeader::new(name).required(required))
        .collect();
    Ok(serde_json::to_string_pretty(&expected)?)
}

/// Read an expected-header list from a JSON file.
pub fn load_expected_headers(path: &Path) -> Result<Vec<ExpectedHeader>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let headers: Vec<ExpectedHeader> = serde_json::from_str(&text)
        .with_context(|| format!("invalid expected headers in {}", path.display()))?;
    debug!(path = %path.display(), count = headers.len(), "expected headers loaded");
    Ok(headers)
}

fn apply_default(
    session: &mut ReconcileSession<CsvDataset>,
    name: &str,
    raw: &str,
) -> Result<()> {
    let header = session
        .expected_header(name)
        .with_context(|| format!("unknown expected header '{name}'"))?;
    let kind = header
        .default_rule()
        .map(DefaultValueRule::kind)
        .with_context(|| format!("expected header '{name}' does not take a value"))?;
    let value = kind.parse(raw)?;
    session.set_value(name, Some(value))?;
    Ok(())
}

fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), count = records.len(), "records written");
    Ok(())
}
