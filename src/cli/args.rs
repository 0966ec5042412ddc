//! CLI argument definitions using clap
//!
//! Commands:
//! - midlet-store init --config <path> [--database <path>]
//! - midlet-store serve --config <path> [--database <path>] [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// midlet-store - app catalog backend for legacy MIDlet devices
#[derive(Parser, Debug)]
#[command(name = "midlet-store")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema and exit
    Init {
        /// Path to configuration file (optional; defaults apply if missing)
        #[arg(long, default_value = "./midlet-store.json")]
        config: PathBuf,

        /// SQLite database path, overrides the config file
        #[arg(long, env = "DATABASE_URL")]
        database: Option<String>,
    },

    /// Serve the store API over HTTP
    Serve {
        /// Path to configuration file (optional; defaults apply if missing)
        #[arg(long, default_value = "./midlet-store.json")]
        config: PathBuf,

        /// SQLite database path, overrides the config file
        #[arg(long, env = "DATABASE_URL")]
        database: Option<String>,

        /// Port to listen on, overrides the config file
        #[arg(long, env = "PORT")]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
