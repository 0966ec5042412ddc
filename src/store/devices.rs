//! Device registration and capability lookups.

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::matcher::ApiSet;

use super::errors::{StoreError, StoreResult};
use super::models::{DeviceRegistration, RegisteredDevice};

/// Register a device, or update it in place if the identifier is known.
///
/// Supplied name/manufacturer overwrite stored values; absent ones are kept.
/// When `apis` is present the device's associations are replaced by the
/// subset of names found in the `apis` table. Unknown names are dropped.
pub fn register_device(
    conn: &mut Connection,
    registration: &DeviceRegistration,
) -> StoreResult<RegisteredDevice> {
    let identifier = registration.identifier.trim();
    if identifier.is_empty() {
        return Err(StoreError::validation("Device identifier is required"));
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = find_device_id(&tx, identifier)?;
    let (id, created) = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE devices SET
                     name = COALESCE(?2, name),
                     manufacturer = COALESCE(?3, manufacturer)
                 WHERE id = ?1",
                params![id, registration.name, registration.manufacturer],
            )?;
            (id, false)
        }
        None => {
            tx.execute(
                "INSERT INTO devices (identifier, name, manufacturer) VALUES (?1, ?2, ?3)",
                params![identifier, registration.name, registration.manufacturer],
            )?;
            (tx.last_insert_rowid(), true)
        }
    };

    if let Some(apis) = &registration.apis {
        tx.execute("DELETE FROM devices_apis WHERE device_id = ?1", params![id])?;
        for name in apis.iter() {
            tx.execute(
                "INSERT INTO devices_apis (device_id, api_id)
                 SELECT ?1, id FROM apis WHERE name = ?2 ORDER BY id LIMIT 1",
                params![id, name],
            )?;
        }
    }

    let linked_apis: i64 = tx.query_row(
        "SELECT COUNT(*) FROM devices_apis WHERE device_id = ?1",
        params![id],
        |row| row.get(0),
    )?;

    tx.commit()?;

    Ok(RegisteredDevice {
        id,
        created,
        linked_apis: linked_apis as usize,
    })
}

/// Find a device's row id by its external identifier.
pub fn find_device_id(conn: &Connection, identifier: &str) -> StoreResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM devices WHERE identifier = ?1",
        params![identifier],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// APIs a registered device supports.
///
/// Fails with `NotFound` if the identifier has never registered.
pub fn device_apis(conn: &Connection, identifier: &str) -> StoreResult<ApiSet> {
    let device_id = find_device_id(conn, identifier)?
        .ok_or_else(|| StoreError::not_found("Device", identifier))?;

    let mut stmt = conn.prepare(
        "SELECT a.name FROM devices_apis da
         JOIN apis a ON a.id = da.api_id
         WHERE da.device_id = ?1",
    )?;
    let names = stmt.query_map(params![device_id], |row| row.get::<_, String>(0))?;
    names.collect::<Result<ApiSet, _>>().map_err(Into::into)
}
