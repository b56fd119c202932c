//! Description-based entry filtering for `mt day`.

use anyhow::{Context, Result};
use clap::Args;
use regex::{Regex, RegexBuilder};

/// Filter flags shared by the per-day views.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only keep entries whose description matches this regular expression.
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Drop entries whose description matches this regular expression.
    #[arg(long, value_name = "REGEX")]
    pub ignore: Option<String>,

    /// Make --filter and --ignore case-insensitive.
    #[arg(long)]
    pub ignore_case: bool,

    /// Drop entries with an empty description.
    #[arg(long)]
    pub ignore_empty: bool,
}

/// Compiled include/exclude patterns.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
    ignore_empty: bool,
}

impl EntryFilter {
    /// Compiles the flags; a malformed pattern names the flag it came from.
    pub fn from_args(args: &FilterArgs) -> Result<Self> {
        let build = |pattern: &Option<String>, flag: &str| -> Result<Option<Regex>> {
            pattern
                .as_deref()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(args.ignore_case)
                        .build()
                        .with_context(|| format!("invalid --{flag} regex: {p}"))
                })
                .transpose()
        };

        Ok(Self {
            include: build(&args.filter, "filter")?,
            exclude: build(&args.ignore, "ignore")?,
            ignore_empty: args.ignore_empty,
        })
    }

    pub fn matches(&self, description: &str) -> bool {
        if self.ignore_empty && description.trim().is_empty() {
            return false;
        }
        let hit = |re: &Regex| re.is_match(description);
        let included = self.include.as_ref().is_none_or(hit);
        let excluded = self.exclude.as_ref().is_some_and(hit);
        included && !excluded
    }

    /// Keeps the entries whose description passes the filter.
    pub fn apply<T, F>(&self, entries: Vec<T>, description: F) -> Vec<T>
    where
        F: Fn(&T) -> &str,
    {
        entries
            .into_iter()
            .filter(|entry| self.matches(description(entry)))
            .collect()
    }
}
