//! Vote Concurrency Tests
//!
//! Several connections to one database file vote at the same time. The
//! counter must equal the sum of the stored votes, and a device never ends
//! up with more than one vote row for an app.

mod common;

use std::sync::{Arc, Barrier};
use std::thread;

use midlet_store::store::{self, DeviceRegistration, Store};
use midlet_store::votes::VoteDirection;
use tempfile::TempDir;

use common::{count, seed};

const VOTERS: usize = 8;

fn file_store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(&dir.path().join("catalog.db")).unwrap();
    seed(&store);
    (dir, store)
}

fn register(store: &Store, identifier: &str) {
    let registration = DeviceRegistration::new(identifier);
    store
        .with_conn(|conn| store::register_device(conn, &registration))
        .unwrap();
}

#[test]
fn test_distinct_devices_all_counted() {
    let (dir, store) = file_store();
    for i in 0..VOTERS {
        register(&store, &format!("dev-{}", i));
    }

    let path = dir.path().join("catalog.db");
    let barrier = Arc::new(Barrier::new(VOTERS));
    let handles: Vec<_> = (0..VOTERS)
        .map(|i| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let handle = Store::open(&path).unwrap();
                barrier.wait();
                handle
                    .with_conn(|conn| {
                        store::cast_vote(conn, 1, &format!("dev-{}", i), VoteDirection::Upvote)
                    })
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        count(&store, "SELECT votes FROM apps WHERE id = 1"),
        20 + VOTERS as i64
    );
    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM votes WHERE app_id = 1"),
        VOTERS as i64
    );
}

#[test]
fn test_same_device_keeps_single_vote() {
    let (dir, store) = file_store();
    register(&store, "dev-1");

    let path = dir.path().join("catalog.db");
    let barrier = Arc::new(Barrier::new(VOTERS));
    let handles: Vec<_> = (0..VOTERS)
        .map(|i| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let handle = Store::open(&path).unwrap();
                let direction = if i % 2 == 0 {
                    VoteDirection::Upvote
                } else {
                    VoteDirection::Downvote
                };
                barrier.wait();
                handle
                    .with_conn(|conn| store::cast_vote(conn, 3, "dev-1", direction))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        count(&store, "SELECT COUNT(*) FROM votes WHERE app_id = 3"),
        1
    );

    // Whichever direction landed last, the counter is base +/- 1
    let votes = count(&store, "SELECT votes FROM apps WHERE id = 3");
    let stored: i64 = count(
        &store,
        "SELECT CASE vote_type WHEN 'upvote' THEN 1 ELSE -1 END FROM votes WHERE app_id = 3",
    );
    assert_eq!(votes, 5 + stored);
}

#[test]
fn test_shared_handle_across_threads() {
    let (_dir, store) = file_store();
    for i in 0..VOTERS {
        register(&store, &format!("dev-{}", i));
    }

    let handles: Vec<_> = (0..VOTERS)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || {
                store
                    .with_conn(|conn| {
                        store::cast_vote(conn, 2, &format!("dev-{}", i), VoteDirection::Downvote)
                    })
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        count(&store, "SELECT votes FROM apps WHERE id = 2"),
        -10 - VOTERS as i64
    );
}
