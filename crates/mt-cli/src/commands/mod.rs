//! CLI subcommand implementations.

pub mod day;
pub mod fix;
pub mod hours;
pub mod report;
pub mod validate;
