//! Read queries over the app catalog.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::matcher::ApiRequirements;

use super::errors::{StoreError, StoreResult};
use super::models::{AppDetail, AppSummary};

/// Number of apps returned by the top chart
pub const TOP_CHART_LIMIT: i64 = 10;

const SUMMARY_COLUMNS: &str = "a.id, a.name, a.description, a.small_icon_url, a.download_url,
     a.is_featured, a.minimum_apis, a.used_apis, a.votes";

/// All apps, ordered by id.
pub fn list_apps(conn: &Connection) -> StoreResult<Vec<AppSummary>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM apps a ORDER BY a.id"
    ))?;
    let rows = stmt.query_map([], row_to_summary)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Apps whose name contains `query` (case-insensitive), ordered by id.
///
/// The query is matched literally, surrounding whitespace included; `%` and
/// `_` have no special meaning.
pub fn search_apps(conn: &Connection, query: &str) -> StoreResult<Vec<AppSummary>> {
    if query.trim().is_empty() {
        return Err(StoreError::validation("Search query is required"));
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM apps a
         WHERE instr(lower(a.name), lower(?1)) > 0
         ORDER BY a.id"
    ))?;
    let rows = stmt.query_map(params![query], row_to_summary)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// The [`TOP_CHART_LIMIT`] highest-voted apps, optionally within a category.
///
/// Ties are broken by id. An unknown category name is `NotFound`.
pub fn top_chart(conn: &Connection, category: Option<&str>) -> StoreResult<Vec<AppSummary>> {
    let category_id = match category {
        Some(name) => Some(
            find_category_id(conn, name)?.ok_or_else(|| StoreError::not_found("Category", name))?,
        ),
        None => None,
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM apps a
         WHERE ?1 IS NULL OR a.category_id = ?1
         ORDER BY COALESCE(a.votes, 0) DESC, a.id ASC
         LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![category_id, TOP_CHART_LIMIT], row_to_summary)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Detail view of one app, with developer/category names and screenshots.
pub fn app_detail(conn: &Connection, id: i64) -> StoreResult<AppDetail> {
    let detail = conn
        .query_row(
            "SELECT a.id, a.description, a.version, a.size, d.name, c.name, a.votes
             FROM apps a
             LEFT JOIN developers d ON d.id = a.developer_id
             LEFT JOIN categories c ON c.id = a.category_id
             WHERE a.id = ?1",
            params![id],
            |row| {
                Ok(AppDetail {
                    id: row.get(0)?,
                    description: row.get(1)?,
                    version: row.get(2)?,
                    size: row.get(3)?,
                    developer: row.get(4)?,
                    category: row.get(5)?,
                    votes: row.get::<_, Option<i64>>(6)?.unwrap_or(0),
                    screenshots: Vec::new(),
                })
            },
        )
        .optional()?;

    let mut detail = detail.ok_or_else(|| StoreError::not_found("App", id))?;
    detail.screenshots = screenshots_for_app(conn, id)?;
    Ok(detail)
}

/// Screenshot URLs for an app in insertion order.
pub fn screenshots_for_app(conn: &Connection, app_id: i64) -> StoreResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT image_url FROM screenshots WHERE app_id = ?1 ORDER BY id")?;
    let rows = stmt.query_map(params![app_id], |row| row.get::<_, String>(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn find_category_id(conn: &Connection, name: &str) -> StoreResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM categories WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

fn row_to_summary(row: &Row) -> rusqlite::Result<AppSummary> {
    let minimum: String = row.get(6)?;
    let used: String = row.get(7)?;
    Ok(AppSummary {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        small_icon_url: row.get(3)?,
        download_url: row.get(4)?,
        is_featured: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
        requirements: ApiRequirements::parse(&minimum, &used),
        votes: row.get::<_, Option<i64>>(8)?.unwrap_or(0),
    })
}
