//! Locating `YYYY-MM-DD.md` daily notes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use regex::Regex;

use crate::period::DateRange;

static NOTE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})\.md$").unwrap());

/// A daily note found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// File name of the note for `date`.
pub fn note_file_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d.md").to_string()
}

/// Date encoded in a note's file name, if it follows the naming pattern.
pub fn note_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let caps = NOTE_NAME_RE.captures(name)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%Y-%m-%d").ok()
}

/// Whether a path's file name looks like `YYYY-MM-DD.md`.
pub fn is_note_file_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| NOTE_NAME_RE.is_match(name))
}

/// Joins a relative path onto the notes directory.
pub fn resolve_in(notes_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        notes_dir.join(path)
    }
}

/// Picks the note for a per-day command.
///
/// An explicit file must be named `YYYY-MM-DD.md` (optionally with a
/// directory). Without one, the note for `date` is used.
pub fn resolve_note(notes_dir: &Path, file: Option<&Path>, date: NaiveDate) -> Result<PathBuf> {
    let path = match file {
        Some(file) => {
            if !is_note_file_name(file) {
                bail!(
                    "filename must be in the format YYYY-MM-DD.md (optionally with a directory path): {}",
                    file.display()
                );
            }
            resolve_in(notes_dir, file)
        }
        None => notes_dir.join(note_file_name(date)),
    };

    if !path.is_file() {
        bail!("file '{}' does not exist", path.display());
    }
    Ok(path)
}

/// Lists the notes in `dir` whose date falls within `range`, oldest first.
///
/// Only the top level of `dir` is scanned; files that do not follow the
/// naming pattern are ignored.
pub fn discover_notes(dir: &Path, range: DateRange) -> Result<Vec<NoteFile>> {
    let context = || format!("failed to read notes directory {}", dir.display());
    let entries = fs::read_dir(dir).with_context(context)?;

    let mut notes = Vec::new();
    for entry in entries {
        let entry = entry.with_context(context)?;
        let path = entry.path();
        let Some(date) = note_date(&path) else {
            continue;
        };
        if !range.contains(date) || !path.is_file() {
            continue;
        }
        notes.push(NoteFile { date, path });
    }

    notes.sort_by_key(|note| note.date);
    tracing::debug!(dir = %dir.display(), count = notes.len(), "discovered notes");
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_note_file_name() {
        assert_eq!(note_file_name(d(2025, 1, 9)), "2025-01-09.md");
    }

    #[test]
    fn test_note_date_parses_valid_names() {
        let nested = Path::new("notes/2025-01-09.md");
        assert_eq!(note_date(nested), Some(d(2025, 1, 9)));
        assert_eq!(note_date(Path::new("2025-13-01.md")), None);
        assert_eq!(note_date(Path::new("2025-01-09.txt")), None);
        assert_eq!(note_date(Path::new("x2025-01-09.md")), None);
    }

    #[test]
    fn test_resolve_note_rejects_bad_names() {
        let temp = TempDir::new().unwrap();
        let file = Path::new("notes.md");
        let err = resolve_note(temp.path(), Some(file), d(2025, 1, 1)).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD.md"));
    }

    #[test]
    fn test_resolve_note_joins_relative_paths() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("2025-01-02.md"), "").unwrap();

        let file = Path::new("2025-01-02.md");
        let path = resolve_note(temp.path(), Some(file), d(2025, 1, 1)).unwrap();
        assert_eq!(path, temp.path().join("2025-01-02.md"));

        let path = resolve_note(temp.path(), None, d(2025, 1, 2)).unwrap();
        assert_eq!(path, temp.path().join("2025-01-02.md"));
    }

    #[test]
    fn test_resolve_note_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = resolve_note(temp.path(), None, d(2025, 1, 2)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_discover_notes_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let names = [
            "2025-01-03.md",
            "2025-01-01.md",
            "2025-01-10.md",
            "readme.md",
            "2025-01-02.txt",
        ];
        for name in names {
            fs::write(temp.path().join(name), "").unwrap();
        }
        fs::create_dir(temp.path().join("2025-01-02.md")).unwrap();

        let range = DateRange {
            start: d(2025, 1, 1),
            end: d(2025, 1, 5),
        };
        let notes = discover_notes(temp.path(), range).unwrap();
        let dates: Vec<_> = notes.iter().map(|n| n.date).collect();
        assert_eq!(dates, vec![d(2025, 1, 1), d(2025, 1, 3)]);
    }

    #[test]
    fn test_discover_notes_missing_dir() {
        let temp = TempDir::new().unwrap();
        let range = DateRange::single(d(2025, 1, 1));
        assert!(discover_notes(&temp.path().join("missing"), range).is_err());
    }
}
