//! `mt hours`: summarise inline `Time.<Category>.<Name>: <hours>` tallies.

use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, ValueEnum};
use mt_core::{HourTally, TallyRow, extract_hour_tallies, summarize_tallies};

use crate::Config;
use crate::notes::discover_notes;
use crate::period::{DateRange, RangeArgs};
use crate::table::{Align, Table};

/// Tally category to summarise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum TallyCategory {
    #[default]
    Area,
    Focus,
    Proj,
    Prof,
}

impl TallyCategory {
    /// Category as written in the notes.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Area => "Area",
            Self::Focus => "Focus",
            Self::Proj => "Proj",
            Self::Prof => "Prof",
        }
    }
}

#[derive(Debug, Args)]
pub struct HoursArgs {
    /// Category of tallies to summarise.
    #[arg(long, value_enum, ignore_case = true, default_value_t)]
    pub category: TallyCategory,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Directory to look for notes in.
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Output tab-separated values.
    #[arg(long)]
    pub tsv: bool,
}

/// Tallies gathered across a range.
#[derive(Debug, Default)]
pub struct TallyData {
    pub tallies: Vec<HourTally>,
    /// Notes that contained at least one tally.
    pub days: usize,
}

/// Collects the tallies of every note in the range. Unreadable notes are
/// logged and skipped.
pub fn collect_tallies(notes_dir: &Path, range: DateRange) -> Result<TallyData> {
    let mut data = TallyData::default();
    for note in discover_notes(notes_dir, range)? {
        let content = match fs::read_to_string(&note.path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %note.path.display(), error = %err, "skipping note");
                continue;
            }
        };
        let tallies = extract_hour_tallies(&content);
        if !tallies.is_empty() {
            data.days += 1;
            data.tallies.extend(tallies);
        }
    }
    Ok(data)
}

/// Formats the per-name table followed by the total and daily average.
pub fn format_hours(rows: &[TallyRow], total: f64, days: usize, tsv: bool) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new(["Name", "Hours", "%"])
        .align(1, Align::Right)
        .align(2, Align::Right);
    for row in rows {
        table.push([
            row.name.clone(),
            format!("{:.1}", row.hours),
            format!("{:.2}", row.percent),
        ]);
    }

    let mut output = if tsv {
        table.render_tsv()
    } else {
        table.render()
    };
    // days is at least 1 whenever there are rows.
    let days = u32::try_from(days.max(1)).unwrap_or(u32::MAX);
    writeln!(output).unwrap();
    writeln!(output, "Total hours: {total}").unwrap();
    writeln!(output, "Average hours/day: {}", total / f64::from(days)).unwrap();
    output
}

pub fn run<W: Write>(writer: &mut W, args: &HoursArgs, config: &Config) -> Result<()> {
    let range = args.range.resolve()?;
    let notes_dir = config.notes_dir_or(args.path.as_deref());
    let data = collect_tallies(notes_dir, range)?;
    let (rows, total) = summarize_tallies(&data.tallies, args.category.label());
    let output = format_hours(&rows, total, data.days, args.tsv);
    write!(writer, "{output}")?;
    Ok(())
}
