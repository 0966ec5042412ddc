//! CLI command implementations
//!
//! Configuration is read from an optional JSON file, then overridden by
//! `DATABASE_URL` / `PORT` (or the matching flags).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::init_tracing;
use crate::store::{schema, Store};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (default "./midlet-store.db")
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Default log filter; `RUST_LOG` wins when set (default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Listener and CORS settings
    #[serde(flatten)]
    pub http: HttpServerConfig,
}

fn default_database_path() -> String {
    "./midlet-store.db".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load, apply command line / environment overrides and validate
    pub fn resolve(path: &Path, database: Option<String>, port: Option<u16>) -> CliResult<Self> {
        let mut config = Self::load(path)?;
        if let Some(database) = database {
            config.database_path = normalize_database_url(&database);
        }
        if let Some(port) = port {
            config.http.port = port;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        Ok(())
    }

    /// Get database path as Path
    pub fn database_path(&self) -> &Path {
        Path::new(&self.database_path)
    }
}

/// Accept plain paths as well as `sqlite://` / `sqlite:` URLs
fn normalize_database_url(url: &str) -> String {
    let trimmed = url.trim();
    trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed)
        .to_string()
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, database } => init(&config, database),
        Command::Serve {
            config,
            database,
            port,
        } => serve(&config, database, port),
    }
}

/// Create the database and its schema.
///
/// Safe to run against an existing database; tables are only created if
/// missing.
pub fn init(config_path: &Path, database: Option<String>) -> CliResult<()> {
    let config = Config::resolve(config_path, database, None)?;
    init_tracing(&config.log_filter);

    let store = Store::open(config.database_path())?;
    let version = store.with_conn(|conn| schema::get_schema_version(conn))?;

    info!(
        database = %config.database_path,
        schema_version = version,
        "database initialized"
    );
    Ok(())
}

/// Open the database and serve the store API until stopped
pub fn serve(config_path: &Path, database: Option<String>, port: Option<u16>) -> CliResult<()> {
    let config = Config::resolve(config_path, database, port)?;
    init_tracing(&config.log_filter);

    let store = Store::open(config.database_path())?;
    info!(database = %config.database_path, "database opened");

    let server = HttpServer::with_store(config.http.clone(), store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}
