//! Parsing of single time-block lines.
//!
//! Two grammars are recognised:
//! - full: `HH:MM - HH:MM X: description`, with `X` a type code letter
//! - bare: `HH:MM - HH:MM`, a placeholder with no type or description

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::clock;
use crate::type_code::TypeCode;

/// Project name used when a description carries no `#tag`.
pub const DEFAULT_PROJECT: &str = "General";

/// Prefix stripped from `#Project-Name` tags.
const PROJECT_PREFIX: &str = "Project-";

static FULL_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}:\d{2})\s*-\s*(\d{2}:\d{2})\s+(\p{L}):\s*(.*)$").unwrap());

static BARE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}:\d{2})\s*-\s*(\d{2}:\d{2})$").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\S+)").unwrap());

/// Why a line could not be turned into a [`TimeBlock`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlockParseError {
    /// The line matches neither block grammar.
    #[error("invalid format")]
    InvalidFormat,
    /// A time token is not a real time of day.
    #[error("invalid time '{token}'")]
    InvalidTime { token: String },
    /// The type letter is outside the code table.
    #[error("invalid type code '{code}'")]
    InvalidTypeCode { code: char },
    /// A bare `HH:MM - HH:MM` placeholder has no type to report under.
    #[error("untyped placeholder block")]
    Untyped,
}

/// Shape of a line that matched one of the block grammars.
///
/// Token ranges index into the matched line so repairs can substitute a
/// single token in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockShape<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub end_range: Range<usize>,
    /// Type letter and description, absent for the bare form.
    pub typed: Option<(char, &'a str)>,
}

impl<'a> BlockShape<'a> {
    /// Matches the bare grammar first, then the full grammar.
    pub(crate) fn match_line(line: &'a str) -> Option<Self> {
        if let Some(caps) = BARE_BLOCK_RE.captures(line) {
            let (start, end) = (caps.get(1)?, caps.get(2)?);
            return Some(Self {
                start: start.as_str(),
                end: end.as_str(),
                end_range: end.range(),
                typed: None,
            });
        }

        let caps = FULL_BLOCK_RE.captures(line)?;
        let (start, end) = (caps.get(1)?, caps.get(2)?);
        let code = caps.get(3)?.as_str().chars().next()?;
        let rest = caps.get(4).map_or("", |m| m.as_str());
        Some(Self {
            start: start.as_str(),
            end: end.as_str(),
            end_range: end.range(),
            typed: Some((code, rest)),
        })
    }

    /// Parses both time tokens, reporting the first invalid one.
    pub(crate) fn times(&self) -> Result<(NaiveTime, NaiveTime), BlockParseError> {
        let parse = |token: &str| {
            clock::parse_clock(token).ok_or_else(|| BlockParseError::InvalidTime {
                token: token.to_string(),
            })
        };
        Ok((parse(self.start)?, parse(self.end)?))
    }
}

/// A parsed, typed time block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeBlock {
    #[serde(serialize_with = "clock::serialize_clock")]
    pub start: NaiveTime,
    /// May be at or before `start` when the block crosses midnight.
    #[serde(serialize_with = "clock::serialize_clock")]
    pub end: NaiveTime,
    pub type_code: TypeCode,
    pub project: String,
    /// Description with `#tags` removed.
    pub description: String,
}

impl TimeBlock {
    /// Parses one trimmed line in the full grammar.
    pub fn parse(line: &str) -> Result<Self, BlockParseError> {
        let shape = BlockShape::match_line(line).ok_or(BlockParseError::InvalidFormat)?;
        let (start, end) = shape.times()?;
        let (code, rest) = shape.typed.ok_or(BlockParseError::Untyped)?;
        let type_code =
            TypeCode::from_letter(code).ok_or(BlockParseError::InvalidTypeCode { code })?;
        let (project, description) = split_project(rest);

        Ok(Self {
            start,
            end,
            type_code,
            project,
            description,
        })
    }

    /// Wall-clock duration, corrected for one midnight crossing.
    pub fn duration_minutes(&self) -> u32 {
        clock::span_minutes(self.start, self.end)
    }

    /// Display name of the type code.
    pub const fn type_name(&self) -> &'static str {
        self.type_code.name()
    }
}

/// Whether a trimmed line is a well-formed typed block.
pub fn is_time_block(line: &str) -> bool {
    TimeBlock::parse(line).is_ok()
}

/// Parses a batch of lines, dropping those that are not typed blocks.
pub fn parse_time_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<TimeBlock> {
    lines
        .iter()
        .filter_map(|line| match TimeBlock::parse(line.as_ref()) {
            Ok(block) => Some(block),
            Err(err) => {
                tracing::debug!(line = line.as_ref(), error = %err, "skipping line");
                None
            }
        })
        .collect()
}

/// Project name from the first `#tag` in a description.
///
/// `#Project-Foo` yields `Foo`; any other tag is used verbatim without the
/// `#`; no tag yields [`DEFAULT_PROJECT`].
pub fn project_from_description(description: &str) -> String {
    TAG_RE
        .captures(description)
        .and_then(|caps| caps.get(1))
        .map_or_else(
            || DEFAULT_PROJECT.to_string(),
            |tag| {
                let tag = tag.as_str();
                tag.strip_prefix(PROJECT_PREFIX).unwrap_or(tag).to_string()
            },
        )
}

/// Description with every `#tag` removed and whitespace collapsed.
pub fn strip_tags(description: &str) -> String {
    TAG_RE
        .replace_all(description, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a raw description into `(project, cleaned description)`.
pub fn split_project(description: &str) -> (String, String) {
    (
        project_from_description(description),
        strip_tags(description),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(block: &TimeBlock) -> (String, String, &'static str, String, String) {
        (
            clock::format_clock(block.start),
            clock::format_hm(block.duration_minutes()),
            block.type_name(),
            block.project.clone(),
            block.description.clone(),
        )
    }

    fn rows(lines: &[&str]) -> Vec<(String, String, &'static str, String, String)> {
        parse_time_blocks(lines).iter().map(row).collect()
    }

    fn r(
        start: &str,
        duration: &str,
        kind: &'static str,
        project: &str,
        description: &str,
    ) -> (String, String, &'static str, String, String) {
        (
            start.to_string(),
            duration.to_string(),
            kind,
            project.to_string(),
            description.to_string(),
        )
    }

    #[test]
    fn parses_basic_blocks() {
        let parsed = rows(&[
            "08:00 - 09:00 T: #General Breakfast",
            "09:00 - 12:00 T: #Project-Work Work on project",
            "12:00 - 13:00 B: #General Lunch",
            "13:00 - 14:00 M: #Team Meeting",
        ]);
        assert_eq!(
            parsed,
            vec![
                r("08:00", "1:00", "Task", "General", "Breakfast"),
                r("09:00", "3:00", "Task", "Work", "Work on project"),
                r("12:00", "1:00", "Break", "General", "Lunch"),
                r("13:00", "1:00", "Meeting", "Team", "Meeting"),
            ]
        );
    }

    #[test]
    fn missing_tag_defaults_to_general() {
        let parsed = rows(&["08:00 - 09:00 T: Breakfast", "12:00 - 13:00 B: Lunch"]);
        assert_eq!(
            parsed,
            vec![
                r("08:00", "1:00", "Task", "General", "Breakfast"),
                r("12:00", "1:00", "Break", "General", "Lunch"),
            ]
        );
    }

    #[test]
    fn project_prefix_is_stripped_once() {
        assert_eq!(
            project_from_description("#Project-MyProject Work"),
            "MyProject"
        );
        assert_eq!(project_from_description("#Project-ABC-XYZ Work"), "ABC-XYZ");
        assert_eq!(
            project_from_description("#Project-DEF-GHI-JKL Work"),
            "DEF-GHI-JKL"
        );
        assert_eq!(
            project_from_description("#Managing-Sub-Task subtask"),
            "Managing-Sub-Task"
        );
        assert_eq!(project_from_description("#v1.2_beta ship"), "v1.2_beta");
        assert_eq!(project_from_description("no tag here"), "General");
    }

    #[test]
    fn only_first_tag_names_the_project() {
        let (project, description) = split_project("Review #Team notes for #Other");
        assert_eq!(project, "Team");
        assert_eq!(description, "Review notes for");
    }

    #[test]
    fn midnight_crossing_duration() {
        let block = TimeBlock::parse("23:30 - 00:15 L: #Reading late").unwrap();
        assert_eq!(block.duration_minutes(), 45);
    }

    #[test]
    fn description_may_be_empty() {
        let block = TimeBlock::parse("08:00 - 09:00 C:").unwrap();
        assert_eq!(block.type_code, TypeCode::Comms);
        assert_eq!(block.project, "General");
        assert_eq!(block.description, "");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            TimeBlock::parse("not a block"),
            Err(BlockParseError::InvalidFormat)
        );
        assert_eq!(
            TimeBlock::parse("08:00 - 09:00 T #General missing colon"),
            Err(BlockParseError::InvalidFormat)
        );
        assert_eq!(
            TimeBlock::parse("25:00 - 26:00 T: bad"),
            Err(BlockParseError::InvalidTime {
                token: "25:00".to_string(),
            })
        );
        assert_eq!(
            TimeBlock::parse("08:00 - 09:00 X: bad"),
            Err(BlockParseError::InvalidTypeCode { code: 'X' })
        );
        assert_eq!(
            TimeBlock::parse("08:00 - 09:00"),
            Err(BlockParseError::Untyped)
        );
    }

    #[test]
    fn shape_reports_end_token_range() {
        let line = "09:00 - 10:00 T: task";
        let shape = BlockShape::match_line(line).unwrap();
        assert_eq!(&line[shape.end_range.clone()], "10:00");
        assert_eq!(shape.typed, Some(('T', "task")));

        let bare = BlockShape::match_line("09:00 - 10:00").unwrap();
        assert_eq!(bare.typed, None);
    }

    #[test]
    fn serializes_clock_times() {
        let block = TimeBlock::parse("08:00 - 09:30 M: #Team sync").unwrap();
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["start"], "08:00");
        assert_eq!(json["end"], "09:30");
        assert_eq!(json["type_code"], "Meeting");
        assert_eq!(json["project"], "Team");
    }
}
