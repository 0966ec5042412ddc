//! SQLite schema creation and versioning.

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use super::errors::{StoreError, StoreResult};

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 1;

/// How long a connection waits on another writer before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create all tables and indexes if they don't exist.
///
/// Idempotent; safe to call on an existing database.
pub fn create_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Open or create a catalog database at the given path.
pub fn open_database(path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let version = get_schema_version(&conn)?;
    if version > CURRENT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            supported: CURRENT_VERSION,
        });
    }
    if version < CURRENT_VERSION {
        create_schema(&conn)?;
    }

    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> StoreResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Get the current schema version, or 0 if no schema exists.
pub fn get_schema_version(conn: &Connection) -> StoreResult<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Devices register themselves; identifier is the natural key
CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier TEXT NOT NULL UNIQUE,
    name TEXT,
    manufacturer TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS developers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- Platform capabilities (JSRs)
CREATE TABLE IF NOT EXISTS apis (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_apis_name ON apis(name);

CREATE TABLE IF NOT EXISTS devices_apis (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_id INTEGER NOT NULL REFERENCES devices(id),
    api_id INTEGER NOT NULL REFERENCES apis(id)
);
CREATE INDEX IF NOT EXISTS idx_devices_apis_device ON devices_apis(device_id);

-- minimum_apis / used_apis are comma-separated API names
CREATE TABLE IF NOT EXISTS apps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    small_icon_url TEXT NOT NULL,
    download_url TEXT NOT NULL,
    is_featured BOOLEAN,
    minimum_apis TEXT NOT NULL,
    used_apis TEXT NOT NULL,
    votes INTEGER DEFAULT 0,
    version TEXT NOT NULL,
    size REAL NOT NULL,
    developer_id INTEGER REFERENCES developers(id),
    category_id INTEGER REFERENCES categories(id),
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_apps_category ON apps(category_id);

CREATE TABLE IF NOT EXISTS screenshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    app_id INTEGER NOT NULL REFERENCES apps(id),
    image_url TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_screenshots_app ON screenshots(app_id);

-- One row per (app, device); enforced by the vote transaction
CREATE TABLE IF NOT EXISTS votes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    app_id INTEGER NOT NULL REFERENCES apps(id),
    device_id INTEGER NOT NULL REFERENCES devices(id),
    vote_type TEXT NOT NULL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_votes_app_device ON votes(app_id, device_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_memory_creates_tables() {
        let conn = open_memory().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN
                 ('devices','categories','developers','apis','devices_apis','apps','screenshots','votes')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 8);
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
    }

    #[test]
    fn test_create_schema_is_idempotent() {
        let conn = open_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_reopen_file_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.db");

        {
            let conn = open_database(&path).unwrap();
            conn.execute(
                "INSERT INTO devices (identifier) VALUES ('dev-1')",
                [],
            )
            .unwrap();
        }

        let conn = open_database(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_rejects_newer_schema() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.db");

        {
            let conn = open_database(&path).unwrap();
            conn.execute("INSERT INTO schema_version (version) VALUES (99)", [])
                .unwrap();
        }

        let result = open_database(&path);
        assert!(matches!(
            result,
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
    }
}
