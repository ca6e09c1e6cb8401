//! Terminal tables for reconcile results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use serde::Serialize;

use recon_model::{AutoMatching, MatchState};
use recon_session::{Dataset, ReconcileSession, ReconcileSummary};

use crate::commands::ReconcileResult;

/// One expected header and how it was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRow {
    pub expected: String,
    pub required: bool,
    pub state: String,
    /// Source column mapped to the header.
    pub source: Option<String>,
    /// Value that will be injected, for headers resolved by a value.
    pub value: Option<String>,
}

/// A source column no expected header claimed, with its closest candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedColumn {
    pub column: String,
    pub suggestion: Option<String>,
    pub score: Option<String>,
}

/// Rows in the session's display order.
pub fn match_rows<D: Dataset>(session: &ReconcileSession<D>) -> Vec<MatchRow> {
    session
        .match_states()
        .into_iter()
        .map(|(header, state)| MatchRow {
            expected: header.name().to_string(),
            required: header.is_required(),
            state: state.as_str().to_string(),
            source: session
                .tracker()
                .original_for(header.name())
                .map(str::to_string),
            value: match state {
                MatchState::ValueProvided => header.resolved_value().map(ToString::to_string),
                _ => None,
            },
        })
        .collect()
}

/// Unmapped source columns, each with the best still-unmapped header.
pub fn unmapped_columns<D: Dataset>(session: &ReconcileSession<D>) -> Vec<UnmappedColumn> {
    let tracker = session.tracker();
    tracker
        .entries()
        .iter()
        .filter(|entry| !entry.is_mapped())
        .map(|entry| {
            let best = session
                .suggestions(entry.original())
                .into_iter()
                .find(|s| !tracker.is_mapped(s.header.name()));
            UnmappedColumn {
                column: entry.original().to_string(),
                suggestion: best.as_ref().map(|s| s.header.name().to_string()),
                score: best.map(|s| s.score.explain()),
            }
        })
        .collect()
}

pub fn print_reconcile(result: &ReconcileResult) {
    println!("{}", match_table(&result.rows));
    if !result.unmapped.is_empty() {
        println!("{}", unmapped_table(&result.unmapped));
    }
    println!("{}", summary_line(&result.summary));
    match result.records {
        Some(count) => println!("Records: {count}"),
        None => println!("Required headers unresolved; no records built"),
    }
}

/// Header counts against expected headers, column counts against the file.
pub fn summary_line(summary: &ReconcileSummary) -> String {
    format!(
        "Required: {}/{}  Mapped: {}/{}  Values: {}  Unmapped columns: {}/{}",
        summary.required_satisfied,
        summary.required_total,
        summary.mapped,
        summary.total_expected,
        summary.value_provided,
        summary.unmapped_columns,
        summary.source_columns
    )
}

pub fn print_modes() {
    println!("{}", modes_table());
}

pub fn match_table(rows: &[MatchRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Expected"),
        header_cell("Required"),
        header_cell("State"),
        header_cell("Source column"),
        header_cell("Value"),
    ]);
    apply_match_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.expected).add_attribute(Attribute::Bold),
            required_cell(row.required),
            state_cell(&row.state),
            optional_cell(row.source.as_deref()),
            optional_cell(row.value.as_deref()),
        ]);
    }
    table
}

pub fn unmapped_table(columns: &[UnmappedColumn]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Unmapped column"),
        header_cell("Closest header"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    for column in columns {
        table.add_row(vec![
            Cell::new(&column.column).fg(Color::Yellow),
            optional_cell(column.suggestion.as_deref()),
            optional_cell(column.score.as_deref()),
        ]);
    }
    table
}

pub fn modes_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Mode"), header_cell("Description")]);
    apply_table_style(&mut table);
    for mode in AutoMatching::ALL {
        let name = if mode == AutoMatching::default() {
            format!("{mode} (default)")
        } else {
            mode.to_string()
        };
        table.add_row(vec![
            Cell::new(name).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(mode.description()),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_match_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn required_cell(required: bool) -> Cell {
    if required {
        Cell::new("yes").add_attribute(Attribute::Bold)
    } else {
        dim_cell("no")
    }
}

fn state_cell(state: &str) -> Cell {
    let color = [
        (MatchState::Mapped, Color::Green),
        (MatchState::ValueProvided, Color::Blue),
        (MatchState::RequiredAndMissing, Color::Red),
    ]
    .into_iter()
    .find(|(known, _)| known.as_str() == state)
    .map_or(Color::DarkGrey, |(_, color)| color);
    Cell::new(state).fg(color)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
