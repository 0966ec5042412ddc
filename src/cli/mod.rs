//! CLI module for midlet-store
//!
//! Provides command-line interface for:
//! - init: Create the database schema
//! - serve: Run the HTTP store API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
