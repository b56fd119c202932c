//! `mt validate`: check notes for malformed, overlapping or gapped blocks.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Args;
use mt_core::{ValidationError, extract_section_lines, validate_section};

use crate::Config;
use crate::notes;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Notes to check; defaults to today's note.
    pub files: Vec<PathBuf>,

    /// Base directory for relative paths.
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,
}

/// Reads a note and validates its time section.
pub fn validate_file(path: &Path) -> Result<Vec<ValidationError>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(validate_section(&extract_section_lines(&content)))
}

/// Writes one indented line per error.
pub fn write_errors<W: Write>(writer: &mut W, errors: &[ValidationError]) -> Result<()> {
    for error in errors {
        writeln!(writer, "  {error}")?;
    }
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, args: &ValidateArgs, config: &Config) -> Result<()> {
    let notes_dir = config.notes_dir_or(args.path.as_deref());
    let files = if args.files.is_empty() {
        vec![PathBuf::from(notes::note_file_name(Local::now().date_naive()))]
    } else {
        args.files.clone()
    };

    let mut failed = 0;
    for file in &files {
        let path = notes::resolve_in(notes_dir, file);
        let errors = match validate_file(&path) {
            Ok(errors) => errors,
            Err(err) => {
                failed += 1;
                writeln!(writer, "{}: {err:#}", path.display())?;
                continue;
            }
        };
        if errors.is_empty() {
            writeln!(writer, "{}: OK", path.display())?;
        } else {
            failed += 1;
            writeln!(writer, "{}: {} error(s)", path.display(), errors.len())?;
            write_errors(writer, &errors)?;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) failed validation", files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &Path) -> Config {
        Config {
            notes_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn test_reports_ok_and_errors_per_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("2025-01-01.md"),
            "## Time\n08:00 - 09:00 T: Plan\n09:00 - 10:00 M: Sync\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("2025-01-02.md"),
            "## Time\n08:00 - 09:00 T: Plan\n09:30 - 10:00 X: Oops\n",
        )
        .unwrap();

        let args = ValidateArgs {
            files: vec!["2025-01-01.md".into(), "2025-01-02.md".into()],
            path: None,
        };
        let mut output = Vec::new();
        let err = run(&mut output, &args, &config_for(temp.path())).unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 file(s) failed validation");

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&temp.path().display().to_string(), "<dir>");
        insta::assert_snapshot!(output, @r"
        <dir>/2025-01-01.md: OK
        <dir>/2025-01-02.md: 1 error(s)
          Line 2: Invalid type code 'X' (expected one of T, M, C, A, L, B)
        ");
    }

    #[test]
    fn test_missing_file_does_not_stop_later_files() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("2025-01-02.md"),
            "## Time\n08:00 - 09:00 T: Plan\n09:30 - 10:00 M: Sync\n",
        )
        .unwrap();

        let args = ValidateArgs {
            files: vec!["2025-01-01.md".into(), "2025-01-02.md".into()],
            path: None,
        };
        let mut output = Vec::new();
        let err = run(&mut output, &args, &config_for(temp.path())).unwrap_err();
        assert_eq!(err.to_string(), "2 of 2 file(s) failed validation");

        let output = String::from_utf8(output).unwrap();
        let output = output.replace(&temp.path().display().to_string(), "<dir>");
        let mut lines = output.lines();
        assert!(
            lines
                .next()
                .unwrap()
                .starts_with("<dir>/2025-01-01.md: failed to read <dir>/2025-01-01.md: ")
        );
        assert_eq!(
            lines.collect::<Vec<_>>(),
            [
                "<dir>/2025-01-02.md: 1 error(s)",
                "  Lines 1-2: Gap of 30 minutes between 09:00 and 09:30",
            ]
        );
    }

    #[test]
    fn test_validate_file_collects_all_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("2025-01-01.md");
        fs::write(
            &path,
            "## Time\n08:00 - 09:00 T: A\n08:30 - 09:30 T: B\nnot a block\n",
        )
        .unwrap();
        let errors = validate_file(&path).unwrap();
        assert_eq!(errors.len(), 2);
    }
}
