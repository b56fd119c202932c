//! Daily-note time tracking CLI library.
//!
//! This crate provides the `mt` command-line interface on top of `mt-core`.

mod cli;
pub mod commands;
mod config;
pub mod filter;
pub mod notes;
pub mod period;
pub mod table;

pub use cli::{Cli, Commands};
pub use config::{Config, DEFAULT_MODEL};
