//! Core domain logic for daily-note time tracking.
//!
//! This crate contains the fundamental types and logic for:
//! - Section extraction: finding the `## Time` section of a note
//! - Parsing: turning `HH:MM - HH:MM X: description` lines into time blocks
//! - Validation: per-line checks plus overlap and gap detection
//! - Repair: closing gaps and inserting missing type-code colons in place
//! - Aggregation: minutes by project, type and focus

pub mod aggregate;
pub mod clock;
pub mod legacy;
pub mod parser;
pub mod repair;
pub mod section;
pub mod tally;
pub mod type_code;
pub mod validate;

pub use aggregate::{
    Summary, TotalTime, Totals, TrackedEntry, calculate_total_time, summarize_by_focus,
    summarize_by_project, summarize_by_type,
};
pub use legacy::{LegacyEntry, parse_legacy_entries};
pub use parser::{BlockParseError, DEFAULT_PROJECT, TimeBlock, parse_time_blocks};
pub use repair::{
    RepairError, RepairOptions, RepairReport, fix_missing_colons, fix_time_gaps, repair_note,
};
pub use section::{Document, SectionLine, extract_section_lines, extract_time_section};
pub use tally::{HourTally, TallyRow, extract_hour_tallies, summarize_tallies};
pub use type_code::{Focus, TypeCode, UnknownTypeCode};
pub use validate::{ParsedLine, ValidationError, validate_section, validate_time_entries};
