//! Summaries of tracked time by project, type and focus.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::parser::TimeBlock;
use crate::type_code::{Focus, TypeCode};

/// Minutes keyed by project, type name or focus name.
pub type Totals = BTreeMap<String, u32>;

/// An entry that can be summed into summaries.
///
/// Implemented by [`TimeBlock`] and by legacy single-timestamp entries, which
/// may lack a duration, type or project.
pub trait TrackedEntry {
    /// Duration in minutes, `None` when it could not be computed.
    fn minutes(&self) -> Option<u32>;

    /// Type display name, if the entry is typed.
    fn type_name(&self) -> Option<&str>;

    /// Project name, if the entry carries one.
    fn project(&self) -> Option<&str>;

    /// Whether the entry is a break.
    fn is_break(&self) -> bool;
}

impl TrackedEntry for TimeBlock {
    fn minutes(&self) -> Option<u32> {
        Some(self.duration_minutes())
    }

    fn type_name(&self) -> Option<&str> {
        Some(self.type_code.name())
    }

    fn project(&self) -> Option<&str> {
        Some(&self.project)
    }

    fn is_break(&self) -> bool {
        self.type_code == TypeCode::Break
    }
}

/// Total time, split into whole hours and remaining minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TotalTime {
    pub hours: u32,
    pub minutes: u32,
}

impl TotalTime {
    pub const fn from_minutes(total: u32) -> Self {
        Self {
            hours: total / 60,
            minutes: total % 60,
        }
    }

    pub const fn as_minutes(self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl fmt::Display for TotalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours, self.minutes)
    }
}

/// Minutes per project. Entries without a duration are skipped.
pub fn summarize_by_project<E: TrackedEntry>(entries: &[E]) -> Totals {
    sum_by(entries, TrackedEntry::project)
}

/// Minutes per type name. Entries without a duration are skipped.
pub fn summarize_by_type<E: TrackedEntry>(entries: &[E]) -> Totals {
    sum_by(entries, TrackedEntry::type_name)
}

/// Folds type totals into focus buckets.
///
/// `Task` and `Learning` are deep work, `Meeting` is meetings, `Comms` and
/// `Admin` are shallow. `Break` and unknown names are dropped.
pub fn summarize_by_focus(type_totals: &Totals) -> Totals {
    let mut focus_totals = Totals::new();
    for (type_name, minutes) in type_totals {
        if let Some(focus) = Focus::for_type_name(type_name) {
            *focus_totals.entry(focus.name().to_string()).or_insert(0) += minutes;
        }
    }
    focus_totals
}

/// Sum of all durations, excluding breaks unless `include_breaks` is set.
pub fn calculate_total_time<E: TrackedEntry>(entries: &[E], include_breaks: bool) -> TotalTime {
    let total = entries
        .iter()
        .filter(|entry| include_breaks || !entry.is_break())
        .filter_map(TrackedEntry::minutes)
        .sum();
    TotalTime::from_minutes(total)
}

/// The three summaries plus the total for one set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub by_project: Totals,
    pub by_type: Totals,
    pub by_focus: Totals,
    pub total: TotalTime,
}

impl Summary {
    pub fn from_entries<E: TrackedEntry>(entries: &[E], include_breaks: bool) -> Self {
        let by_type = summarize_by_type(entries);
        Self {
            by_project: summarize_by_project(entries),
            by_focus: summarize_by_focus(&by_type),
            by_type,
            total: calculate_total_time(entries, include_breaks),
        }
    }

    /// Adds another summary's minutes into this one, key by key.
    pub fn merge(&mut self, other: &Self) {
        merge_totals(&mut self.by_project, &other.by_project);
        merge_totals(&mut self.by_type, &other.by_type);
        merge_totals(&mut self.by_focus, &other.by_focus);
        self.total = TotalTime::from_minutes(self.total.as_minutes() + other.total.as_minutes());
    }
}

/// Totals as `(key, minutes)` rows, largest first; ties keep key order.
pub fn ranked(totals: &Totals) -> Vec<(&str, u32)> {
    let mut rows: Vec<_> = totals.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    rows.sort_by_key(|(_, minutes)| std::cmp::Reverse(*minutes));
    rows
}

fn sum_by<E, F>(entries: &[E], key: F) -> Totals
where
    E: TrackedEntry,
    F: Fn(&E) -> Option<&str>,
{
    let mut totals = Totals::new();
    for entry in entries {
        let (Some(name), Some(minutes)) = (key(entry), entry.minutes()) else {
            continue;
        };
        *totals.entry(name.to_string()).or_insert(0) += minutes;
    }
    totals
}

fn merge_totals(into: &mut Totals, from: &Totals) {
    for (key, minutes) in from {
        *into.entry(key.clone()).or_insert(0) += minutes;
    }
}
