//! In-place repairs of a note's time section.
//!
//! Repairs are planned against a [`Document`] as a list of [`LineFix`]es, each
//! replacing one physical line. Only the planned lines change; everything
//! else in the note is written back byte for byte.
//!
//! Two repairs exist:
//! - gap repair extends a block's end time to the start of the next block
//!   when validation reports a gap between them (overlaps are never touched)
//! - colon repair inserts the missing `:` in `HH:MM - HH:MM X description`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use thiserror::Error;

use crate::clock;
use crate::parser::BlockShape;
use crate::section::{Document, SectionLine};
use crate::validate::{self, Adjacency};

static MISSING_COLON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}:\d{2}\s*-\s*\d{2}:\d{2}\s+[TMCALB]) \S").unwrap());

/// Errors at the file boundary of a repair.
#[derive(Debug, Error)]
pub enum RepairError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A planned replacement of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFix {
    /// 0-based physical line index in the note.
    pub file_index: usize,
    /// 1-based position in the time section.
    pub line_number: usize,
    pub before: String,
    pub after: String,
}

/// Which repairs to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    pub colons: bool,
    pub gaps: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            colons: true,
            gaps: true,
        }
    }
}

/// Number of lines each repair changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub colons_fixed: usize,
    pub gaps_fixed: usize,
}

impl RepairReport {
    pub const fn total(&self) -> usize {
        self.colons_fixed + self.gaps_fixed
    }
}

/// Plans end-time rewrites closing every reported gap.
///
/// Blocks are walked in the validator's chronological order; for each pair
/// separated by a gap, the earlier block's end time becomes the later
/// block's start time. Lines that fail per-line validation are left alone.
pub fn plan_gap_fixes(doc: &Document) -> Vec<LineFix> {
    let section = doc.section_lines();
    let check = validate::check_lines(&section);
    let sorted = validate::chronological(&check.parsed);

    let mut fixes = Vec::new();
    for pair in sorted.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if !matches!(validate::adjacency(current, next), Adjacency::Gap { .. }) {
            continue;
        }
        let Some(line) = find_line(&section, current.line_number) else {
            continue;
        };
        let Some(before) = doc.line(line.file_index) else {
            continue;
        };
        if let Some(after) = rewrite_end_time(before, next.start) {
            fixes.push(LineFix {
                file_index: line.file_index,
                line_number: line.number,
                before: before.to_string(),
                after,
            });
        }
    }
    fixes
}

/// Plans colon insertions for blocks written as `HH:MM - HH:MM X text`.
pub fn plan_colon_fixes(doc: &Document) -> Vec<LineFix> {
    doc.section_lines()
        .into_iter()
        .filter_map(|line| {
            let before = doc.line(line.file_index)?;
            let after = insert_missing_colon(before)?;
            Some(LineFix {
                file_index: line.file_index,
                line_number: line.number,
                before: before.to_string(),
                after,
            })
        })
        .collect()
}

/// Applies planned fixes to the document.
pub fn apply_fixes(doc: &mut Document, fixes: &[LineFix]) {
    for fix in fixes {
        tracing::debug!(
            line = fix.line_number,
            before = %fix.before,
            after = %fix.after,
            "rewriting time block"
        );
        doc.replace_line(fix.file_index, &fix.after);
    }
}

/// Runs the selected repairs: colons first, then gaps on the re-extracted section.
pub fn repair_document(doc: &mut Document, options: RepairOptions) -> RepairReport {
    let mut report = RepairReport::default();

    if options.colons {
        let fixes = plan_colon_fixes(doc);
        apply_fixes(doc, &fixes);
        report.colons_fixed = fixes.len();
    }

    if options.gaps {
        let fixes = plan_gap_fixes(doc);
        apply_fixes(doc, &fixes);
        report.gaps_fixed = fixes.len();
    }

    report
}

/// Repairs a note file in place. The file is only written if something changed.
pub fn repair_note(path: &Path, options: RepairOptions) -> Result<RepairReport, RepairError> {
    let content = fs::read_to_string(path).map_err(|source| RepairError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc = Document::parse(&content);
    let report = repair_document(&mut doc, options);

    if report.total() == 0 {
        tracing::debug!(path = %path.display(), "nothing to repair");
        return Ok(report);
    }

    write_note(path, &doc.render())?;
    tracing::info!(
        path = %path.display(),
        colons = report.colons_fixed,
        gaps = report.gaps_fixed,
        "repaired note"
    );
    Ok(report)
}

/// Closes the gaps in a note file. Returns the number of blocks rewritten.
pub fn fix_time_gaps(path: &Path) -> Result<usize, RepairError> {
    let options = RepairOptions {
        colons: false,
        gaps: true,
    };
    repair_note(path, options).map(|report| report.gaps_fixed)
}

/// Inserts missing type-code colons in a note file. Returns the number of lines fixed.
pub fn fix_missing_colons(path: &Path) -> Result<usize, RepairError> {
    let options = RepairOptions {
        colons: true,
        gaps: false,
    };
    repair_note(path, options).map(|report| report.colons_fixed)
}

/// Substitutes the end-time token of a block line, leaving all other bytes as they are.
fn rewrite_end_time(line: &str, new_end: NaiveTime) -> Option<String> {
    let indent = line.len() - line.trim_start().len();
    let shape = BlockShape::match_line(line.trim())?;
    let range = (shape.end_range.start + indent)..(shape.end_range.end + indent);

    let mut rewritten = line.to_string();
    rewritten.replace_range(range, &clock::format_clock(new_end));
    Some(rewritten)
}

fn insert_missing_colon(line: &str) -> Option<String> {
    let indent = line.len() - line.trim_start().len();
    let caps = MISSING_COLON_RE.captures(line.trim())?;
    let at = caps.get(1)?.end() + indent;

    let mut fixed = line.to_string();
    fixed.insert(at, ':');
    Some(fixed)
}

fn find_line(section: &[SectionLine], number: usize) -> Option<&SectionLine> {
    section.iter().find(|line| line.number == number)
}

/// Writes the note through a temporary sibling file and a rename.
fn write_note(path: &Path, content: &str) -> Result<(), RepairError> {
    let write_err = |source| RepairError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content).map_err(write_err)?;
    if let Err(source) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(source));
    }
    Ok(())
}
