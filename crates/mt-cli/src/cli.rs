//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::day::DayArgs;
use crate::commands::fix::FixArgs;
use crate::commands::hours::HoursArgs;
use crate::commands::report::ReportArgs;
use crate::commands::validate::ValidateArgs;

/// Time blocks from markdown daily notes.
///
/// Reads the `## Time` section of `YYYY-MM-DD.md` notes, validates the
/// blocks, repairs common mistakes and summarises where the time went.
#[derive(Debug, Parser)]
#[command(name = "mt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarise one day's note.
    Day(DayArgs),

    /// Check notes for malformed, overlapping or gapped blocks.
    Validate(ValidateArgs),

    /// Insert missing type-code colons and close gaps in place.
    Fix(FixArgs),

    /// Aggregate time blocks across a date range.
    Report(ReportArgs),

    /// Summarise inline `Time.<Category>.<Name>: <hours>` tallies.
    Hours(HoursArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_day_flags() {
        let cli = Cli::try_parse_from([
            "mt",
            "day",
            "--yesterday",
            "--filter",
            "report",
            "--ignore-case",
            "--json",
        ])
        .unwrap();
        let Some(Commands::Day(args)) = cli.command else {
            panic!("expected day command");
        };
        assert!(args.yesterday);
        assert!(args.filter.ignore_case);
        assert_eq!(args.filter.filter.as_deref(), Some("report"));
        assert!(args.json);
    }

    fn parses(line: &str) -> bool {
        Cli::try_parse_from(line.split_whitespace()).is_ok()
    }

    #[test]
    fn test_today_conflicts_with_yesterday() {
        assert!(!parses("mt day --today --yesterday"));
    }

    #[test]
    fn test_period_flags_are_exclusive() {
        assert!(!parses("mt report --this-week --last-month"));
        assert!(!parses("mt report --this-week --from 2025-01-01"));
        assert!(parses("mt report --from 2025-01-01 --to 2025-01-31"));
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["mt", "validate", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
