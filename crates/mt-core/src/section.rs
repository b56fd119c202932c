//! Locating the `## Time` section inside a daily note.
//!
//! A note is held as a [`Document`] of physical lines that keep their own
//! terminators, so a repaired note can be written back with every untouched
//! byte intact.

use crate::parser;

/// Heading that opens the time section. Matched against the trimmed line.
pub const TIME_HEADING: &str = "## Time";

/// A note split into physical lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

/// One non-blank line of the time section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLine {
    /// 1-based position among the section's non-blank lines.
    pub number: usize,
    /// 0-based index of the physical line in the [`Document`].
    pub file_index: usize,
    /// Trimmed line text.
    pub text: String,
}

impl Document {
    /// Splits note content into lines, keeping `\n` / `\r\n` on each line.
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    /// Number of physical lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line content at `index`, without its terminator.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|raw| split_terminator(raw).0)
    }

    /// Iterates line contents without terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|raw| split_terminator(raw).0)
    }

    /// Replaces the content of line `index`, keeping its original terminator.
    ///
    /// Returns `false` if there is no such line.
    pub fn replace_line(&mut self, index: usize, content: &str) -> bool {
        let Some(raw) = self.lines.get_mut(index) else {
            return false;
        };
        let terminator = split_terminator(raw).1.to_string();
        *raw = format!("{content}{terminator}");
        true
    }

    /// Reassembles the note.
    pub fn render(&self) -> String {
        self.lines.concat()
    }

    /// Every non-blank line of the time section, well-formed or not.
    ///
    /// Collection starts after the first line whose trimmed text equals
    /// [`TIME_HEADING`] and stops before the next line starting with `#`.
    /// Returns an empty list when the heading is missing.
    pub fn section_lines(&self) -> Vec<SectionLine> {
        let mut section = Vec::new();
        let mut in_section = false;

        for (file_index, line) in self.lines().enumerate() {
            let trimmed = line.trim();
            if !in_section {
                in_section = trimmed == TIME_HEADING;
                continue;
            }
            if trimmed.starts_with('#') {
                break;
            }
            if trimmed.is_empty() {
                continue;
            }
            section.push(SectionLine {
                number: section.len() + 1,
                file_index,
                text: trimmed.to_string(),
            });
        }

        section
    }

    /// Only the well-formed typed blocks of the time section.
    pub fn time_block_lines(&self) -> Vec<String> {
        self.section_lines()
            .into_iter()
            .filter(|line| parser::is_time_block(&line.text))
            .map(|line| line.text)
            .collect()
    }
}

/// Strict extraction: the well-formed typed blocks of the note's time section.
pub fn extract_time_section(content: &str) -> Vec<String> {
    Document::parse(content).time_block_lines()
}

/// Loose extraction: every non-blank line of the note's time section.
pub fn extract_section_lines(content: &str) -> Vec<SectionLine> {
    Document::parse(content).section_lines()
}

fn split_terminator(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}
