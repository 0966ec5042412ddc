//! # Catalog Store
//!
//! SQLite persistence for devices, the app catalog and votes.
//!
//! Query functions take a `&Connection` (or `&mut Connection` when they open
//! a transaction) so they can be exercised directly in tests. The [`Store`]
//! handle owns the process's connection and is passed explicitly to whoever
//! needs it; there is no global connection.

mod apps;
mod devices;
mod errors;
mod models;
pub mod schema;
mod votes;

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

pub use apps::{app_detail, list_apps, screenshots_for_app, search_apps, top_chart, TOP_CHART_LIMIT};
pub use devices::{device_apis, find_device_id, register_device};
pub use errors::{StoreError, StoreResult};
pub use models::{AppDetail, AppSummary, DeviceRegistration, RegisteredDevice, TalliedVote};
pub use votes::cast_vote;

/// Shared handle to the catalog database
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open (and if needed create) a file database
    pub fn open(path: &Path) -> StoreResult<Self> {
        Ok(Self::from_connection(schema::open_database(path)?))
    }

    /// Open an in-memory database with the schema applied
    pub fn open_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(schema::open_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` with exclusive access to the connection.
    ///
    /// Blocks the calling thread; async callers should go through
    /// `spawn_blocking`.
    pub fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Connection) -> StoreResult<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        f(&mut conn)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use rusqlite::Connection;

    use super::schema::open_memory;

    /// Reference data shared by the store and route unit tests
    pub const SEED_SQL: &str = r#"
        INSERT INTO apis (id, name, description) VALUES
            (1, 'JSR75', 'FileConnection and PIM'),
            (2, 'JSR82', 'Bluetooth'),
            (3, 'JSR135', 'Mobile Media');
        INSERT INTO categories (id, name) VALUES (1, 'Communication'), (2, 'Games');
        INSERT INTO developers (id, name) VALUES (1, 'PolyAce');
        INSERT INTO apps (id, name, description, small_icon_url, download_url, is_featured,
                          minimum_apis, used_apis, votes, version, size, developer_id, category_id)
        VALUES
            (1, 'Slack', 'desc', 'http://localhost:8080/static/slack-48.gif',
             'http://localhost:8080/static/slack.png', 1, 'JSR75', 'JSR75,JSR82', 20,
             '1.0.0', 12, 1, 1),
            (2, 'Snake', 'classic', 'http://localhost:8080/static/snake.png',
             'http://localhost:8080/static/snake.jar', 0, '', '', -10, '2.1', 8.5, NULL, 2),
            (3, 'Bluetooth Chat', 'chat', 'http://localhost:8080/static/bt.png',
             'http://localhost:8080/static/bt.jar', NULL, 'JSR82', 'JSR82, JSR135', 5,
             '0.9', 30, 1, 1);
        INSERT INTO screenshots (app_id, image_url) VALUES
            (1, 'http://localhost:8080/static/slack.gif'),
            (1, 'http://localhost:8080/static/slack-2.gif');
    "#;

    pub fn seeded_connection() -> Connection {
        let conn = open_memory().unwrap();
        conn.execute_batch(SEED_SQL).unwrap();
        conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::votes::VoteDirection;

    #[test]
    fn test_store_handle_shares_connection() {
        let store = Store::open_memory().unwrap();
        store
            .with_conn(|conn| Ok(conn.execute_batch(testing::SEED_SQL)?))
            .unwrap();

        let clone = store.clone();
        clone
            .with_conn(|conn| register_device(conn, &DeviceRegistration::new("dev-1")))
            .unwrap();

        let tallied = store
            .with_conn(|conn| cast_vote(conn, 1, "dev-1", VoteDirection::Upvote))
            .unwrap();
        assert_eq!(tallied.votes, 21);
    }
}
