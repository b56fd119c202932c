//! `mt fix`: repair a note in place, then re-validate it.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Args;
use mt_core::{RepairOptions, repair_note};

use crate::Config;
use crate::commands::validate::{validate_file, write_errors};
use crate::notes;

#[derive(Debug, Args)]
pub struct FixArgs {
    /// Note to repair (`YYYY-MM-DD.md`); defaults to today's note.
    pub file: Option<PathBuf>,

    /// Directory to look for notes in.
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Only insert missing colons after type codes.
    #[arg(long)]
    pub colons: bool,

    /// Only close gaps between consecutive blocks.
    #[arg(long)]
    pub gaps: bool,
}

impl FixArgs {
    /// Both repairs run unless one is asked for explicitly.
    const fn options(&self) -> RepairOptions {
        if self.colons || self.gaps {
            RepairOptions {
                colons: self.colons,
                gaps: self.gaps,
            }
        } else {
            RepairOptions {
                colons: true,
                gaps: true,
            }
        }
    }
}

pub fn run<W: Write>(writer: &mut W, args: &FixArgs, config: &Config) -> Result<()> {
    let notes_dir = config.notes_dir_or(args.path.as_deref());
    let path = notes::resolve_note(notes_dir, args.file.as_deref(), Local::now().date_naive())?;
    let options = args.options();

    let report = repair_note(&path, options)
        .with_context(|| format!("failed to repair {}", path.display()))?;

    if options.colons {
        writeln!(writer, "Fixed {} missing colon(s)", report.colons_fixed)?;
    }
    if options.gaps {
        if report.gaps_fixed == 0 {
            writeln!(writer, "No gaps found")?;
        } else {
            writeln!(writer, "Fixed {} gap(s)", report.gaps_fixed)?;
        }
    }

    let errors = validate_file(&path)?;
    if errors.is_empty() {
        writeln!(writer, "{}: OK", path.display())?;
        return Ok(());
    }

    writeln!(
        writer,
        "{}: {} error(s) remain",
        path.display(),
        errors.len()
    )?;
    write_errors(writer, &errors)?;
    bail!("{} still has validation errors", path.display());
}
