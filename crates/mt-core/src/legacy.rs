//! Single-timestamp entries from older notes.
//!
//! Each line holds only a start time (`HH:MM activity`); an entry lasts until
//! the next entry starts, and the last entry has no duration.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;

use crate::aggregate::TrackedEntry;
use crate::clock;
use crate::section::Document;

/// Activities starting with this word count as breaks.
pub const BREAK_PREFIX: &str = "Break";

static LEGACY_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}:\d{2})\s?(.*)$").unwrap());

static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]+)?\]\]").unwrap());

/// A start-time-only entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegacyEntry {
    #[serde(serialize_with = "clock::serialize_clock")]
    pub start: NaiveTime,
    /// Minutes until the next entry; `None` for the last one.
    pub duration: Option<u32>,
    pub activity: String,
}

impl LegacyEntry {
    /// Duration as `H:MM`, or `-` when there is none.
    pub fn duration_label(&self) -> String {
        clock::format_duration(self.duration)
    }
}

impl TrackedEntry for LegacyEntry {
    fn minutes(&self) -> Option<u32> {
        self.duration
    }

    fn type_name(&self) -> Option<&str> {
        None
    }

    fn project(&self) -> Option<&str> {
        None
    }

    fn is_break(&self) -> bool {
        self.activity.trim().starts_with(BREAK_PREFIX)
    }
}

/// Lines of the time section that start with a time token.
pub fn extract_legacy_lines(content: &str) -> Vec<String> {
    Document::parse(content)
        .section_lines()
        .into_iter()
        .filter(|line| LEGACY_LINE_RE.is_match(&line.text))
        .map(|line| line.text)
        .collect()
}

/// Parses start-time lines, deriving durations from consecutive starts.
///
/// Lines whose time token is not a real time of day are skipped.
pub fn parse_legacy_entries<S: AsRef<str>>(lines: &[S]) -> Vec<LegacyEntry> {
    let starts: Vec<(NaiveTime, String)> = lines
        .iter()
        .filter_map(|line| {
            let caps = LEGACY_LINE_RE.captures(line.as_ref())?;
            let start = clock::parse_clock(caps.get(1)?.as_str())?;
            let activity = caps.get(2).map_or("", |m| m.as_str());
            Some((start, strip_wikilinks(activity)))
        })
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(idx, (start, activity))| LegacyEntry {
            start: *start,
            duration: starts
                .get(idx + 1)
                .map(|(next, _)| clock::span_minutes(*start, *next)),
            activity: activity.clone(),
        })
        .collect()
}

/// Replaces `[[target]]` and `[[target|alias]]` with `target`.
pub fn strip_wikilinks(text: &str) -> String {
    WIKILINK_RE.replace_all(text, "$1").into_owned()
}
