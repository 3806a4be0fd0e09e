//! Command-line interface for catalog-browser.
//!
//! This module provides CLI commands for searching the remote catalog and
//! managing the locally saved items.

mod commands;

pub use commands::{Cli, Commands, run_command};
