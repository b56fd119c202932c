//! Plain-text table rendering.

use std::fmt::Write;

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A table rendered as a GitHub-flavoured markdown grid or as TSV.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let aligns = vec![Align::Left; headers.len()];
        Self {
            headers,
            aligns,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    pub fn push<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Renders `| a | b |` rows with a `|---|` separator under the header.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut output = String::new();

        let line = |cells: &[String], output: &mut String| {
            let padded: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(col, width)| {
                    let cell = cells.get(col).map_or("", String::as_str);
                    match self.aligns[col] {
                        Align::Left => format!("{cell:<width$}"),
                        Align::Right => format!("{cell:>width$}"),
                    }
                })
                .collect();
            writeln!(output, "| {} |", padded.join(" | ")).unwrap();
        };

        line(&self.headers, &mut output);
        let rule: Vec<String> = widths
            .iter()
            .zip(&self.aligns)
            .map(|(width, align)| match align {
                Align::Left => "-".repeat(width + 2),
                Align::Right => format!("{}:", "-".repeat(width + 1)),
            })
            .collect();
        writeln!(output, "|{}|", rule.join("|")).unwrap();
        for row in &self.rows {
            line(row, &mut output);
        }
        output
    }

    /// Renders tab-separated values with a header row.
    pub fn render_tsv(&self) -> String {
        let mut output = String::new();
        writeln!(output, "{}", self.headers.join("\t")).unwrap();
        for row in &self.rows {
            writeln!(output, "{}", row.join("\t")).unwrap();
        }
        output
    }
}

/// A titled section header underlined with box-drawing characters.
pub fn heading(title: &str) -> String {
    format!("{title}\n{}", "─".repeat(title.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_render_pads_columns() {
        let mut table = Table::new(["Name", "Hours"]).align(1, Align::Right);
        table.push(["Managing", "5.5"]);
        table.push(["QA", "12.0"]);
        assert_snapshot!(table.render(), @r"
        | Name     | Hours |
        |----------|------:|
        | Managing |   5.5 |
        | QA       |  12.0 |
        ");
    }

    #[test]
    fn test_render_tsv() {
        let mut table = Table::new(["a", "b"]);
        table.push(["1", "2"]);
        assert_eq!(table.render_tsv(), "a\tb\n1\t2\n");
    }

    #[test]
    fn test_heading_underline_matches_title() {
        assert_eq!(heading("BY TYPE"), "BY TYPE\n───────");
    }
}
