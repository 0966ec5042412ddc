//! Vote persistence.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::votes::{decide, VoteDirection, VoteOutcome};

use super::devices::find_device_id;
use super::errors::{StoreError, StoreResult};
use super::models::TalliedVote;

/// Record a vote from a device on an app and return the app's new counter.
///
/// The whole read-decide-write sequence runs in one `BEGIN IMMEDIATE`
/// transaction, so concurrent votes for the same (app, device) pair are
/// serialized even across connections. The counter is adjusted with an
/// in-place `votes = votes + delta` update.
pub fn cast_vote(
    conn: &mut Connection,
    app_id: i64,
    device_identifier: &str,
    direction: VoteDirection,
) -> StoreResult<TalliedVote> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let device_id = find_device_id(&tx, device_identifier)?
        .ok_or_else(|| StoreError::not_found("Device", device_identifier))?;

    let app_exists: bool = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM apps WHERE id = ?1)",
        params![app_id],
        |row| row.get(0),
    )?;
    if !app_exists {
        return Err(StoreError::not_found("App", app_id));
    }

    let prior: Option<(i64, String)> = tx
        .query_row(
            "SELECT id, vote_type FROM votes
             WHERE app_id = ?1 AND device_id = ?2
             ORDER BY id LIMIT 1",
            params![app_id, device_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let prior_direction = match &prior {
        Some((vote_id, vote_type)) => Some(vote_type.parse::<VoteDirection>().map_err(|e| {
            StoreError::Corrupt {
                table: "votes",
                id: *vote_id,
                reason: e.to_string(),
            }
        })?),
        None => None,
    };

    let outcome = decide(prior_direction, direction);
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    match (outcome, &prior) {
        (VoteOutcome::Cast { .. }, _) => {
            tx.execute(
                "INSERT INTO votes (app_id, device_id, vote_type, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![app_id, device_id, direction.as_str(), now],
            )?;
        }
        (VoteOutcome::Switched { .. }, Some((vote_id, _))) => {
            tx.execute(
                "UPDATE votes SET vote_type = ?2, created_at = ?3 WHERE id = ?1",
                params![vote_id, direction.as_str(), now],
            )?;
        }
        _ => {}
    }

    if outcome.delta() != 0 {
        tx.execute(
            "UPDATE apps SET votes = COALESCE(votes, 0) + ?2 WHERE id = ?1",
            params![app_id, outcome.delta()],
        )?;
    }

    let votes: i64 = tx.query_row(
        "SELECT COALESCE(votes, 0) FROM apps WHERE id = ?1",
        params![app_id],
        |row| row.get(0),
    )?;

    tx.commit()?;

    Ok(TalliedVote { votes, outcome })
}
