//! Report command for aggregating time blocks across a date range.
//!
//! This module implements `mt report` with the period flags of
//! [`RangeArgs`] and output formats (human-readable, JSON, CSV export).

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use mt_core::clock::format_clock;
use mt_core::{
    Document, Summary, TimeBlock, TotalTime, extract_section_lines, parse_time_blocks,
    validate_section,
};
use serde::Serialize;

use crate::Config;
use crate::commands::day::write_summary;
use crate::notes::discover_notes;
use crate::period::{DateRange, RangeArgs};
use crate::table::heading;

const CSV_HEADER: &str = "date,start,end,duration_minutes,type,project,description";

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Directory to look for notes in.
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Count `Break` entries towards the total time.
    #[arg(long)]
    pub include_breaks: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also write every entry to a CSV file.
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}

/// The blocks of one note that passed validation.
#[derive(Debug, Clone)]
pub struct DayEntries {
    pub date: NaiveDate,
    pub blocks: Vec<TimeBlock>,
}

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub range: DateRange,
    pub days: Vec<DayEntries>,
    /// Notes that could not be read or failed validation.
    pub skipped: usize,
    pub summary: Summary,
}

impl ReportData {
    pub fn average_per_day(&self) -> TotalTime {
        let days = u32::try_from(self.days.len()).unwrap_or(u32::MAX);
        if days == 0 {
            return TotalTime::default();
        }
        TotalTime::from_minutes(self.summary.total.as_minutes() / days)
    }
}

// ========== Report Generation ==========

/// Reads and validates one note, returning its typed blocks.
fn load_day(path: &Path) -> Result<Vec<TimeBlock>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let errors = validate_section(&extract_section_lines(&content));
    if !errors.is_empty() {
        bail!("{} validation error(s)", errors.len());
    }
    let lines = Document::parse(&content).time_block_lines();
    Ok(parse_time_blocks(&lines))
}

/// Aggregates every note in the range, one file at a time.
///
/// Notes that cannot be read or fail validation are logged and skipped.
pub fn generate_report_data(
    notes_dir: &Path,
    range: DateRange,
    include_breaks: bool,
) -> Result<ReportData> {
    let mut data = ReportData {
        range,
        days: Vec::new(),
        skipped: 0,
        summary: Summary::default(),
    };

    for note in discover_notes(notes_dir, range)? {
        match load_day(&note.path) {
            Ok(blocks) => {
                let summary = Summary::from_entries(&blocks, include_breaks);
                data.summary.merge(&summary);
                data.days.push(DayEntries {
                    date: note.date,
                    blocks,
                });
            }
            Err(err) => {
                tracing::warn!(
                    path = %note.path.display(),
                    error = %format!("{err:#}"),
                    "skipping note"
                );
                data.skipped += 1;
            }
        }
    }

    Ok(data)
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "TIME REPORT: {} to {}",
        data.range.start, data.range.end
    )
    .unwrap();
    if data.skipped > 0 {
        writeln!(
            output,
            "Days: {} ({} skipped)",
            data.days.len(),
            data.skipped
        )
        .unwrap();
    } else {
        writeln!(output, "Days: {}", data.days.len()).unwrap();
    }

    if data.days.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No notes found in this range.").unwrap();
        return output;
    }

    write_summary(&mut output, &data.summary);

    writeln!(output).unwrap();
    writeln!(output, "{}", heading("SUMMARY")).unwrap();
    writeln!(output, "Total time:      {}", data.summary.total).unwrap();
    writeln!(output, "Average per day: {}", data.average_per_day()).unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub period: DateRange,
    pub days: usize,
    pub skipped: usize,
    pub summary: &'a Summary,
    pub average_per_day: TotalTime,
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData) -> Result<String> {
    let report = JsonReport {
        period: data.range,
        days: data.days.len(),
        skipped: data.skipped,
        summary: &data.summary,
        average_per_day: data.average_per_day(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== CSV Export ==========

/// Quotes a field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per entry, oldest day first.
pub fn format_csv(data: &ReportData) -> String {
    let mut output = String::new();
    writeln!(output, "{CSV_HEADER}").unwrap();
    for day in &data.days {
        for block in &day.blocks {
            let fields = [
                day.date.to_string(),
                format_clock(block.start),
                format_clock(block.end),
                block.duration_minutes().to_string(),
                block.type_name().to_string(),
                block.project.clone(),
                block.description.clone(),
            ];
            let row: Vec<String> = fields.iter().map(String::as_str).map(csv_field).collect();
            writeln!(output, "{}", row.join(",")).unwrap();
        }
    }
    output
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(writer: &mut W, args: &ReportArgs, config: &Config) -> Result<()> {
    let range = args.range.resolve()?;
    let notes_dir = config.notes_dir_or(args.path.as_deref());
    let include_breaks = args.include_breaks || config.include_breaks;
    let data = generate_report_data(notes_dir, range, include_breaks)?;

    if let Some(csv_path) = &args.csv {
        fs::write(csv_path, format_csv(&data))
            .with_context(|| format!("failed to write {}", csv_path.display()))?;
        tracing::info!(path = %csv_path.display(), days = data.days.len(), "exported CSV");
    }

    if args.json {
        writeln!(writer, "{}", format_report_json(&data)?)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }

    Ok(())
}
