//! CLI argument definitions for csv-recon.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use recon_cli::commands::ReconcileRequest;
use recon_ingest::MAX_CSV_FILE_SIZE;
use recon_model::{AutoMatching, Culture};

#[derive(Parser)]
#[command(
    name = "csv-recon",
    version,
    about = "Reconcile CSV headers against a list of expected headers",
    long_about = "Match the header row of a CSV file to a fixed list of expected headers.\n\n\
                  Headers are matched by alias using exact, strict, or lenient fuzzy\n\
                  comparison. Manual corrections rename columns, defaults fill columns\n\
                  the file lacks, and complete files are written back as CSV or JSON lines."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match a CSV file's headers and build records once they are complete.
    Reconcile(ReconcileArgs),

    /// Print a starter expected-header file from a CSV header row.
    Expected(ExpectedArgs),

    /// List the automatic matching modes.
    Modes,
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// CSV file to reconcile.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// JSON file listing the expected headers.
    #[arg(long = "expected", short = 'e', value_name = "JSON")]
    pub expected: PathBuf,

    /// Automatic matching mode.
    #[arg(long = "matching", value_enum, default_value = "strict")]
    pub matching: MatchingArg,

    /// Culture of numeric cells (invariant, en-US, de-DE, fr-FR, de-CH, ...).
    #[arg(long = "culture", default_value = "invariant", value_parser = parse_culture)]
    pub culture: Culture,

    /// Fail when an expected header has neither a column nor a value.
    #[arg(long = "strict-headers")]
    pub strict_headers: bool,

    /// Largest CSV file accepted, in bytes.
    #[arg(long = "max-file-size", value_name = "BYTES", default_value_t = MAX_CSV_FILE_SIZE)]
    pub max_file_size: u64,

    /// Write the reconciled CSV here.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write records as JSON lines here.
    #[arg(long = "records", value_name = "PATH")]
    pub records: Option<PathBuf>,

    /// Value for an expected header that takes one (repeatable).
    #[arg(long = "default", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub defaults: Vec<(String, String)>,

    /// Map a source column to an expected header (repeatable).
    #[arg(long = "map", value_name = "ORIGINAL=EXPECTED", value_parser = parse_assignment)]
    pub maps: Vec<(String, String)>,

    /// Undo the automatic match of a source column (repeatable).
    #[arg(long = "unmap", value_name = "ORIGINAL")]
    pub unmaps: Vec<String>,
}

impl ReconcileArgs {
    pub fn into_request(self) -> ReconcileRequest {
        ReconcileRequest {
            matching: self.matching.into(),
            culture: self.culture,
            strict_headers: self.strict_headers,
            max_file_size: self.max_file_size,
            maps: self.maps,
            unmaps: self.unmaps,
            defaults: self.defaults,
            output: self.output,
            records: self.records,
            ..ReconcileRequest::new(self.csv, self.expected)
        }
    }
}

#[derive(Parser)]
pub struct ExpectedArgs {
    /// CSV file whose header row seeds the list.
    #[arg(long = "from-csv", value_name = "CSV")]
    pub from_csv: PathBuf,

    /// Mark every generated header as required.
    #[arg(long = "required")]
    pub required: bool,

    /// Largest CSV file accepted, in bytes.
    #[arg(long = "max-file-size", value_name = "BYTES", default_value_t = MAX_CSV_FILE_SIZE)]
    pub max_file_size: u64,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MatchingArg {
    Exact,
    Strict,
    Lenient,
}

impl From<MatchingArg> for AutoMatching {
    fn from(arg: MatchingArg) -> Self {
        match arg {
            MatchingArg::Exact => AutoMatching::Exact,
            MatchingArg::Strict => AutoMatching::Strict,
            MatchingArg::Lenient => AutoMatching::Lenient,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_culture(value: &str) -> Result<Culture, String> {
    value.parse::<Culture>().map_err(|err| err.to_string())
}

/// Split `LEFT=RIGHT` at the first `=`. Both sides are trimmed and must be
/// non-empty.
fn parse_assignment(value: &str) -> Result<(String, String), String> {
    let Some((left, right)) = value.split_once('=') else {
        return Err(format!("expected LEFT=RIGHT, got '{value}'"));
    };
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        return Err(format!("both sides of '{value}' must be non-empty"));
    }
    Ok((left.to_string(), right.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_at_first_equals() {
        assert_eq!(
            parse_assignment("Note = a=b").unwrap(),
            ("Note".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("Age").is_err());
        assert!(parse_assignment("=36").is_err());
    }

    #[test]
    fn reconcile_flags_parse() {
        let cli = Cli::try_parse_from([
            "csv-recon",
            "reconcile",
            "contacts.csv",
            "-e",
            "expected.json",
            "--matching",
            "lenient",
            "--culture",
            "de-DE",
            "--default",
            "Age=36",
            "--map",
            "fname=FirstName",
            "--unmap",
            "notes",
        ])
        .unwrap();
        let Command::Reconcile(args) = cli.command else {
            panic!("expected reconcile command");
        };
        let request = args.into_request();
        assert_eq!(request.matching, AutoMatching::Lenient);
        assert_eq!(request.culture.name(), "de-DE");
        assert_eq!(request.defaults, vec![("Age".to_string(), "36".to_string())]);
        assert_eq!(
            request.maps,
            vec![("fname".to_string(), "FirstName".to_string())]
        );
        assert_eq!(request.unmaps, vec!["notes".to_string()]);
        assert_eq!(request.max_file_size, MAX_CSV_FILE_SIZE);
    }

    #[test]
    fn unknown_culture_is_rejected() {
        let result = Cli::try_parse_from([
            "csv-recon",
            "reconcile",
            "contacts.csv",
            "-e",
            "expected.json",
            "--culture",
            "xx-YY",
        ]);
        assert!(result.is_err());
    }
}
