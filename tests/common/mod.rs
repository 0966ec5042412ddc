//! Shared fixtures for integration tests

#![allow(dead_code)]

use midlet_store::store::{Store, StoreError};

/// Reference catalog: three apps, three APIs, two categories
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

pub fn seed(store: &Store) {
    store
        .with_conn(|conn| conn.execute_batch(SEED_SQL).map_err(StoreError::from))
        .unwrap();
}

pub fn seeded_memory_store() -> Store {
    let store = Store::open_memory().unwrap();
    seed(&store);
    store
}

pub fn count(store: &Store, sql: &str) -> i64 {
    store
        .with_conn(|conn| {
            conn.query_row(sql, [], |row| row.get(0))
                .map_err(StoreError::from)
        })
        .unwrap()
}
