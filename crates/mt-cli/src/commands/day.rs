//! `mt day`: summarise one day's note.

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Days, Local, NaiveDate};
use clap::Args;
use mt_core::aggregate::ranked;
use mt_core::legacy::extract_legacy_lines;
use mt_core::{
    Document, LegacyEntry, Summary, TimeBlock, TotalTime, Totals, calculate_total_time,
    extract_section_lines, parse_legacy_entries, parse_time_blocks, validate_section,
};
use mt_llm::{Client, DayBlock};
use serde::Serialize;

use crate::Config;
use crate::commands::validate::write_errors;
use crate::filter::{EntryFilter, FilterArgs};
use crate::notes;
use crate::table::{Align, Table, heading};

const NO_MATCHES: &str = "No activities match the filter.";

#[derive(Debug, Args)]
#[expect(clippy::struct_excessive_bools, reason = "one clap flag per option")]
pub struct DayArgs {
    /// Note to summarise (`YYYY-MM-DD.md`); defaults to today's note.
    pub file: Option<PathBuf>,

    /// Summarise today's note.
    #[arg(long, conflicts_with_all = ["yesterday", "file"])]
    pub today: bool,

    /// Summarise yesterday's note.
    #[arg(long, conflicts_with = "file")]
    pub yesterday: bool,

    /// Directory to look for notes in.
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Count `Break` entries towards the total time.
    #[arg(long)]
    pub include_breaks: bool,

    /// Read single-timestamp `HH:MM activity` lines.
    #[arg(long)]
    pub legacy: bool,

    /// Output as JSON.
    #[arg(long, conflicts_with = "ai")]
    pub json: bool,

    /// Send the entries to Claude for a productivity analysis.
    #[arg(long)]
    pub ai: bool,
}

#[derive(Debug, Serialize)]
struct DayReport<'a> {
    date: Option<NaiveDate>,
    file: String,
    entries: &'a [TimeBlock],
    summary: &'a Summary,
}

#[derive(Debug, Serialize)]
struct LegacyReport<'a> {
    date: Option<NaiveDate>,
    file: String,
    entries: &'a [LegacyEntry],
    total: TotalTime,
}

pub fn run<W: Write>(writer: &mut W, args: &DayArgs, config: &Config) -> Result<()> {
    let today = Local::now().date_naive();
    let date = if args.yesterday {
        today - Days::new(1)
    } else {
        today
    };
    let notes_dir = config.notes_dir_or(args.path.as_deref());
    let path = notes::resolve_note(notes_dir, args.file.as_deref(), date)?;
    let content =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let filter = EntryFilter::from_args(&args.filter)?;
    let include_breaks = args.include_breaks || config.include_breaks;

    if args.legacy {
        let entries = filter.apply(
            parse_legacy_entries(&extract_legacy_lines(&content)),
            |entry| entry.activity.as_str(),
        );
        if args.ai {
            let blocks: Vec<DayBlock> = entries.iter().map(DayBlock::from).collect();
            return analyze(writer, config, &blocks);
        }
        if args.json {
            let report = LegacyReport {
                date: notes::note_date(&path),
                file: path.display().to_string(),
                entries: &entries,
                total: calculate_total_time(&entries, include_breaks),
            };
            writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        } else {
            write!(writer, "{}", format_legacy(&entries, include_breaks))?;
        }
        return Ok(());
    }

    let errors = validate_section(&extract_section_lines(&content));
    if !errors.is_empty() {
        writeln!(writer, "{}: {} error(s)", path.display(), errors.len())?;
        write_errors(writer, &errors)?;
        bail!("{} failed validation", path.display());
    }

    let blocks = filter.apply(
        parse_time_blocks(&Document::parse(&content).time_block_lines()),
        |block| block.description.as_str(),
    );
    if args.ai {
        let rows: Vec<DayBlock> = blocks.iter().map(DayBlock::from).collect();
        return analyze(writer, config, &rows);
    }

    let summary = Summary::from_entries(&blocks, include_breaks);
    if args.json {
        let report = DayReport {
            date: notes::note_date(&path),
            file: path.display().to_string(),
            entries: &blocks,
            summary: &summary,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write!(writer, "{}", format_day(&blocks, &summary))?;
    }
    Ok(())
}

/// Formats the entry table, the three summaries and the total.
pub fn format_day(blocks: &[TimeBlock], summary: &Summary) -> String {
    if blocks.is_empty() {
        return format!("{NO_MATCHES}\n");
    }

    let headers = ["Start", "End", "Duration", "Type", "Project", "Description"];
    let mut table = Table::new(headers).align(2, Align::Right);
    for block in blocks {
        table.push([
            mt_core::clock::format_clock(block.start),
            mt_core::clock::format_clock(block.end),
            mt_core::clock::format_hm(block.duration_minutes()),
            block.type_name().to_string(),
            block.project.clone(),
            block.description.clone(),
        ]);
    }

    let mut output = table.render();
    write_summary(&mut output, summary);
    writeln!(output).unwrap();
    writeln!(output, "Total time: {}", summary.total).unwrap();
    output
}

/// Appends the per-project, per-type and per-focus sections.
pub fn write_summary(output: &mut String, summary: &Summary) {
    for (title, totals) in [
        ("BY PROJECT", &summary.by_project),
        ("BY TYPE", &summary.by_type),
        ("BY FOCUS", &summary.by_focus),
    ] {
        writeln!(output).unwrap();
        writeln!(output, "{}", heading(title)).unwrap();
        write_totals(output, totals);
    }
}

fn write_totals(output: &mut String, totals: &Totals) {
    let sum: u32 = totals.values().sum();
    let width = totals.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (name, minutes) in ranked(totals) {
        let percent = if sum > 0 {
            (minutes * 100 + sum / 2) / sum
        } else {
            0
        };
        writeln!(
            output,
            "{name:<width$}  {:>6}  {percent:>3}%",
            mt_core::clock::format_hm(minutes)
        )
        .unwrap();
    }
}

/// Formats single-timestamp entries as `Time | Duration | Activity`.
pub fn format_legacy(entries: &[LegacyEntry], include_breaks: bool) -> String {
    if entries.is_empty() {
        return format!("{NO_MATCHES}\n");
    }

    let mut table = Table::new(["Time", "Duration", "Activity"]).align(1, Align::Right);
    for entry in entries {
        table.push([
            mt_core::clock::format_clock(entry.start),
            entry.duration_label(),
            entry.activity.clone(),
        ]);
    }

    let mut output = table.render();
    writeln!(output).unwrap();
    writeln!(
        output,
        "Total time: {}",
        calculate_total_time(entries, include_breaks)
    )
    .unwrap();
    output
}

fn analyze<W: Write>(writer: &mut W, config: &Config, blocks: &[DayBlock]) -> Result<()> {
    if blocks.is_empty() {
        writeln!(writer, "{NO_MATCHES}")?;
        return Ok(());
    }
    let api_key = config
        .api_key()
        .ok_or_else(|| anyhow!("missing Claude API key (set MT_API_KEY or config.toml)"))?;

    let client = Client::new(api_key).context("failed to create LLM client")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize tokio runtime")?;
    let analysis = runtime
        .block_on(client.analyze_day(&config.model, blocks))
        .context("failed to analyze day")?;

    writeln!(writer, "{analysis}")?;
    Ok(())
}
