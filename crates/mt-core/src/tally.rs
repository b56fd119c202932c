//! Inline hour tallies such as `Time.Area.Collab.Meeting: 3`.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static TALLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Time\.(\w+)\.(.+):\s*(\d+\.?\d?)").unwrap());

/// One `Time.<Category>.<Name>: <hours>` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourTally {
    pub category: String,
    pub name: String,
    pub hours: f64,
}

/// One row of a per-category summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyRow {
    pub name: String,
    pub hours: f64,
    pub percent: f64,
}

/// Finds every hour tally in a note. The name may contain dots.
pub fn extract_hour_tallies(text: &str) -> Vec<HourTally> {
    TALLY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let hours = caps.get(3)?.as_str().parse().ok()?;
            Some(HourTally {
                category: caps.get(1)?.as_str().to_string(),
                name: caps.get(2)?.as_str().to_string(),
                hours,
            })
        })
        .collect()
}

/// Sums one category's tallies by name, largest first, with each row's share
/// of the category total.
pub fn summarize_tallies(tallies: &[HourTally], category: &str) -> (Vec<TallyRow>, f64) {
    let mut by_name: BTreeMap<&str, f64> = BTreeMap::new();
    for tally in tallies.iter().filter(|t| t.category == category) {
        *by_name.entry(tally.name.as_str()).or_insert(0.0) += tally.hours;
    }

    let total: f64 = by_name.values().sum();
    let mut rows: Vec<TallyRow> = by_name
        .into_iter()
        .map(|(name, hours)| TallyRow {
            name: name.to_string(),
            hours,
            percent: if total > 0.0 {
                hours / total * 100.0
            } else {
                0.0
            },
        })
        .collect();
    rows.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    (rows, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(category: &str, name: &str, hours: f64) -> HourTally {
        HourTally {
            category: category.to_string(),
            name: name.to_string(),
            hours,
        }
    }

    #[test]
    fn parses_categories_and_dotted_names() {
        let text = r"
            Time.Area.Managing: 4.5
            Time.Proj.Sample: 2.5
            Time.Area.Test: 1
            Time.Area.Collab.Meeting: 3
        ";
        let parsed = extract_hour_tallies(text);
        assert_eq!(
            parsed,
            vec![
                tally("Area", "Managing", 4.5),
                tally("Proj", "Sample", 2.5),
                tally("Area", "Test", 1.0),
                tally("Area", "Collab.Meeting", 3.0),
            ]
        );
    }

    #[test]
    fn ignores_malformed_tags() {
        assert!(extract_hour_tallies("").is_empty());
        assert!(extract_hour_tallies("Time.Area.Managing: ").is_empty());
        let parsed = extract_hour_tallies("Time.Area.Managing: 4.5\nTim.Area.Sample: 2.5\n");
        assert_eq!(parsed, vec![tally("Area", "Managing", 4.5)]);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "sums of exact binary fractions")]
    fn summarizes_one_category() {
        let tallies = vec![
            tally("Area", "Managing", 3.5),
            tally("Area", "Sample", 1.0),
            tally("Area", "Sample", 1.5),
            tally("Area", "Managing", 2.0),
            tally("Proj", "Other", 10.0),
        ];
        let (rows, total) = summarize_tallies(&tallies, "Area");
        assert_eq!(total, 8.0);
        assert_eq!(
            rows,
            vec![
                TallyRow {
                    name: "Managing".to_string(),
                    hours: 5.5,
                    percent: 68.75,
                },
                TallyRow {
                    name: "Sample".to_string(),
                    hours: 2.5,
                    percent: 31.25,
                },
            ]
        );
    }

    #[test]
    fn empty_category_has_zero_total() {
        let (rows, total) = summarize_tallies(&[], "Area");
        assert!(rows.is_empty());
        assert!(total.abs() < f64::EPSILON);
    }
}
