//! Calendar periods and the date-range flags of `mt report` / `mt hours`.
//!
//! All ranges are inclusive on both ends and weeks start on Monday.

use anyhow::{Result, bail};
use chrono::{Datelike, Days, Local, Months, NaiveDate};
use clap::Args;
use serde::Serialize;

/// Named report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    month_start(date) - Months::new(date.month0() % 3)
}

fn year_start(date: NaiveDate) -> NaiveDate {
    month_start(date) - Months::new(date.month0())
}

/// Range that starts at `start` and ends the day before `start + months`.
fn months_from(start: NaiveDate, months: u32) -> DateRange {
    DateRange {
        start,
        end: start + Months::new(months) - Days::new(1),
    }
}

/// Get the range for a given period, using the provided date as reference.
pub fn period_range(period: Period, today: NaiveDate) -> DateRange {
    match period {
        Period::Today => DateRange::single(today),
        Period::Yesterday => DateRange::single(today - Days::new(1)),
        Period::ThisWeek => {
            let start = week_start(today);
            DateRange {
                start,
                end: start + Days::new(6),
            }
        }
        Period::LastWeek => {
            let start = week_start(today) - Days::new(7);
            DateRange {
                start,
                end: start + Days::new(6),
            }
        }
        Period::ThisMonth => months_from(month_start(today), 1),
        Period::LastMonth => months_from(month_start(today) - Months::new(1), 1),
        Period::ThisQuarter => months_from(quarter_start(today), 3),
        Period::LastQuarter => months_from(quarter_start(today) - Months::new(3), 3),
        Period::ThisYear => months_from(year_start(today), 12),
        Period::LastYear => months_from(year_start(today) - Months::new(12), 12),
    }
}

/// Named period flags; at most one may be given.
#[derive(Debug, Clone, Default, Args)]
#[group(id = "period", multiple = false)]
#[expect(clippy::struct_excessive_bools, reason = "one clap flag per period")]
pub struct PeriodFlags {
    /// Today only.
    #[arg(long)]
    pub today: bool,
    /// Yesterday only.
    #[arg(long)]
    pub yesterday: bool,
    /// Monday to Sunday of the current week.
    #[arg(long)]
    pub this_week: bool,
    /// Monday to Sunday of the previous week.
    #[arg(long)]
    pub last_week: bool,
    /// The current calendar month.
    #[arg(long)]
    pub this_month: bool,
    /// The previous calendar month.
    #[arg(long)]
    pub last_month: bool,
    /// The current calendar quarter.
    #[arg(long)]
    pub this_quarter: bool,
    /// The previous calendar quarter.
    #[arg(long)]
    pub last_quarter: bool,
    /// The current calendar year.
    #[arg(long)]
    pub this_year: bool,
    /// The previous calendar year.
    #[arg(long)]
    pub last_year: bool,
}

impl PeriodFlags {
    pub fn period(&self) -> Option<Period> {
        [
            (self.today, Period::Today),
            (self.yesterday, Period::Yesterday),
            (self.this_week, Period::ThisWeek),
            (self.last_week, Period::LastWeek),
            (self.this_month, Period::ThisMonth),
            (self.last_month, Period::LastMonth),
            (self.this_quarter, Period::ThisQuarter),
            (self.last_quarter, Period::LastQuarter),
            (self.this_year, Period::ThisYear),
            (self.last_year, Period::LastYear),
        ]
        .into_iter()
        .find_map(|(set, period)| set.then_some(period))
    }
}

/// Date-range flags shared by the multi-file commands.
#[derive(Debug, Clone, Default, Args)]
pub struct RangeArgs {
    /// First day of the range (default: today).
    #[arg(long, value_name = "DATE", conflicts_with = "period")]
    pub from: Option<NaiveDate>,

    /// Last day of the range (default: today).
    #[arg(long, value_name = "DATE", conflicts_with = "period")]
    pub to: Option<NaiveDate>,

    #[command(flatten)]
    pub period: PeriodFlags,
}

impl RangeArgs {
    /// Resolves the flags against the local date.
    pub fn resolve(&self) -> Result<DateRange> {
        self.resolve_at(Local::now().date_naive())
    }

    /// Resolves the flags against an explicit reference date.
    pub fn resolve_at(&self, today: NaiveDate) -> Result<DateRange> {
        if let Some(period) = self.period.period() {
            return Ok(period_range(period, today));
        }
        let start = self.from.unwrap_or(today);
        let end = self.to.unwrap_or(today);
        if start > end {
            bail!("--from {start} is after --to {end}");
        }
        Ok(DateRange { start, end })
    }
}
