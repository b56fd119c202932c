//! Two-pass validation of a time section.
//!
//! # Algorithm Summary
//!
//! 1. Per line, in section order: grammar, time tokens, type code, and
//!    end-after-start (a block may cross midnight by at most 12 hours).
//! 2. Lines that pass are sorted by a midnight-aware start key and adjacent
//!    pairs are checked for overlaps and gaps.
//!
//! Every problem is collected; an empty list means the section is valid.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use crate::clock::{self, HALF_DAY_MINUTES, MINUTES_PER_DAY};
use crate::parser::{BlockParseError, BlockShape};
use crate::section::SectionLine;
use crate::type_code::TypeCode;

/// Gaps this long or longer are treated as day-boundary artifacts and not
/// reported. This also hides a genuinely untracked half day.
pub const DAY_BOUNDARY_MINUTES: u32 = HALF_DAY_MINUTES;

/// A problem found in a time section.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Line {line}: Invalid format '{text}' (expected 'HH:MM - HH:MM X: description')")]
    InvalidFormat { line: usize, text: String },

    #[error("Line {line}: Invalid time format '{token}'")]
    InvalidTime { line: usize, token: String },

    #[error("Line {line}: Invalid type code '{code}' (expected one of T, M, C, A, L, B)")]
    InvalidTypeCode { line: usize, code: char },

    #[error("Line {line}: End time '{end}' should be after start time '{start}'")]
    EndBeforeStart {
        line: usize,
        start: String,
        end: String,
    },

    #[error("Lines {first}-{second}: Overlapping time blocks (ends {end}, next starts {next_start})")]
    Overlap {
        first: usize,
        second: usize,
        end: String,
        next_start: String,
    },

    #[error("Lines {first}-{second}: Gap of {minutes} minutes between {end} and {next_start}")]
    Gap {
        first: usize,
        second: usize,
        minutes: u32,
        end: String,
        next_start: String,
    },
}

impl ValidationError {
    /// Section line numbers the error refers to.
    pub fn lines(&self) -> Vec<usize> {
        match self {
            Self::InvalidFormat { line, .. }
            | Self::InvalidTime { line, .. }
            | Self::InvalidTypeCode { line, .. }
            | Self::EndBeforeStart { line, .. } => vec![*line],
            Self::Overlap { first, second, .. } | Self::Gap { first, second, .. } => {
                vec![*first, *second]
            }
        }
    }

    pub const fn is_gap(&self) -> bool {
        matches!(self, Self::Gap { .. })
    }
}

/// A section line that passed the per-line checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    /// 1-based position in the section.
    pub line_number: usize,
    pub original_text: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Absent for the bare `HH:MM - HH:MM` form.
    pub type_code: Option<TypeCode>,
}

impl ParsedLine {
    /// Whether the block ends at or before its start, i.e. runs past midnight.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Start minute used for chronological ordering.
    ///
    /// A crossing block that starts in the morning belongs to the next day.
    pub fn sort_key(&self) -> u32 {
        let start = clock::minute_of_day(self.start);
        if self.crosses_midnight() && self.start.hour() < 12 {
            start + MINUTES_PER_DAY
        } else {
            start
        }
    }

    fn corrected_end(&self) -> u32 {
        let end = clock::minute_of_day(self.end);
        if self.crosses_midnight() {
            end + MINUTES_PER_DAY
        } else {
            end
        }
    }
}

/// How one block relates to the next in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjacency {
    Contiguous,
    Overlap,
    Gap { minutes: u32 },
    /// A gap long enough to be a day boundary; not reported.
    DayBoundary,
}

/// Result of the per-line pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCheck {
    pub parsed: Vec<ParsedLine>,
    pub errors: Vec<ValidationError>,
}

/// Validates a loose section, returning every error found.
pub fn validate_section(lines: &[SectionLine]) -> Vec<ValidationError> {
    let LineCheck { parsed, mut errors } = check_lines(lines);
    errors.extend(check_sequence(&parsed));
    errors
}

/// Validates bare line texts, numbering them from 1.
pub fn validate_time_entries<S: AsRef<str>>(lines: &[S]) -> Vec<ValidationError> {
    let section: Vec<SectionLine> = lines
        .iter()
        .enumerate()
        .map(|(idx, text)| SectionLine {
            number: idx + 1,
            file_index: idx,
            text: text.as_ref().trim().to_string(),
        })
        .collect();
    validate_section(&section)
}

/// Pass 1: per-line structure and semantics.
pub fn check_lines(lines: &[SectionLine]) -> LineCheck {
    let mut check = LineCheck::default();
    for line in lines {
        match check_line(line) {
            Ok(parsed) => check.parsed.push(parsed),
            Err(err) => check.errors.push(err),
        }
    }
    check
}

fn check_line(line: &SectionLine) -> Result<ParsedLine, ValidationError> {
    let number = line.number;
    let shape =
        BlockShape::match_line(&line.text).ok_or_else(|| ValidationError::InvalidFormat {
            line: number,
            text: line.text.clone(),
        })?;

    let (start, end) = shape.times().map_err(|err| match err {
        BlockParseError::InvalidTime { token } => ValidationError::InvalidTime {
            line: number,
            token,
        },
        _ => ValidationError::InvalidFormat {
            line: number,
            text: line.text.clone(),
        },
    })?;

    let type_code = match shape.typed {
        Some((code, _)) => Some(
            TypeCode::from_letter(code)
                .ok_or(ValidationError::InvalidTypeCode { line: number, code })?,
        ),
        None => None,
    };

    if end <= start {
        let crossing = clock::span_minutes(start, end);
        // span_minutes reports 0 for equal times; a full day is meant here.
        let crossing = if crossing == 0 {
            MINUTES_PER_DAY
        } else {
            crossing
        };
        if crossing > HALF_DAY_MINUTES {
            return Err(ValidationError::EndBeforeStart {
                line: number,
                start: shape.start.to_string(),
                end: shape.end.to_string(),
            });
        }
    }

    Ok(ParsedLine {
        line_number: number,
        original_text: line.text.clone(),
        start,
        end,
        type_code,
    })
}

/// Sorts parsed lines by [`ParsedLine::sort_key`]; ties keep section order.
pub fn chronological(parsed: &[ParsedLine]) -> Vec<&ParsedLine> {
    let mut sorted: Vec<&ParsedLine> = parsed.iter().collect();
    sorted.sort_by_key(|line| line.sort_key());
    sorted
}

/// Classifies the step from `current` to `next` (already in sorted order).
pub fn adjacency(current: &ParsedLine, next: &ParsedLine) -> Adjacency {
    let current_start = clock::minute_of_day(current.start);
    let current_end = current.corrected_end();
    let mut next_start = clock::minute_of_day(next.start);
    // Only carry the next block over midnight if the current one is a late block.
    if next_start < current_start && current.start.hour() >= 12 {
        next_start += MINUTES_PER_DAY;
    }

    if current_end > next_start {
        Adjacency::Overlap
    } else if current_end < next_start {
        let minutes = next_start - current_end;
        if minutes < DAY_BOUNDARY_MINUTES {
            Adjacency::Gap { minutes }
        } else {
            Adjacency::DayBoundary
        }
    } else {
        Adjacency::Contiguous
    }
}

/// Pass 2: overlaps and gaps between chronologically adjacent blocks.
pub fn check_sequence(parsed: &[ParsedLine]) -> Vec<ValidationError> {
    let sorted = chronological(parsed);
    sorted
        .windows(2)
        .filter_map(|pair| {
            let (current, next) = (pair[0], pair[1]);
            let end = clock::format_clock(current.end);
            let next_start = clock::format_clock(next.start);
            match adjacency(current, next) {
                Adjacency::Overlap => Some(ValidationError::Overlap {
                    first: current.line_number,
                    second: next.line_number,
                    end,
                    next_start,
                }),
                Adjacency::Gap { minutes } => Some(ValidationError::Gap {
                    first: current.line_number,
                    second: next.line_number,
                    minutes,
                    end,
                    next_start,
                }),
                Adjacency::Contiguous | Adjacency::DayBoundary => None,
            }
        })
        .collect()
}
