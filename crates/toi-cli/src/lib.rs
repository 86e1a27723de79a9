//! Shared time-on-ice CLI library.
//!
//! This crate provides the CLI interface over `toi-core`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
