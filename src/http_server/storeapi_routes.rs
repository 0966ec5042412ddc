//! Store API HTTP Routes
//!
//! Endpoints under `/storeapi` used by MIDlet clients. Catalog endpoints
//! answer in CSV; version, registration and voting answer in JSON.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::csv;
use crate::matcher::ApiSet;
use crate::store::{self, DeviceRegistration, Store, StoreResult};
use crate::votes::VoteDirection;

use super::errors::{ApiError, ApiQuery, ApiResult};

// ==================
// Shared State
// ==================

/// Store API state shared across handlers
pub struct StoreApiState {
    pub store: Store,
}

impl StoreApiState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct DeviceQuery {
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopChartQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterQuery {
    #[serde(default)]
    pub device: Option<String>,
    /// Comma-separated API names
    #[serde(default)]
    pub jsrs: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub message: String,
}

/// Raw vote parameters, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteParams {
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub vote_type: Option<String>,
}

/// A validated vote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    pub app_id: i64,
    pub device: String,
    pub direction: VoteDirection,
}

impl VoteParams {
    /// Fill parameters missing from the query string with JSON body fields.
    ///
    /// `appId` may be sent as a number or a string.
    pub fn fill_from_json(&mut self, body: &Value) {
        let field = |key: &str| match body.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        if is_blank(&self.app_id) {
            self.app_id = field("appId");
        }
        if is_blank(&self.device) {
            self.device = field("device");
        }
        if is_blank(&self.vote_type) {
            self.vote_type = field("voteType");
        }
    }

    /// Check every parameter before anything touches the store
    pub fn validate(self) -> ApiResult<VoteRequest> {
        let raw_app_id = required(self.app_id, "appId")?;
        let app_id = raw_app_id
            .parse::<i64>()
            .map_err(|_| ApiError::bad_request(format!("Invalid appId '{}'", raw_app_id)))?;
        let device = required(self.device, "device")?;
        let direction = required(self.vote_type, "voteType")?
            .parse::<VoteDirection>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok(VoteRequest {
            app_id,
            device,
            direction,
        })
    }
}

// ==================
// Store API Routes
// ==================

/// Create store API routes (mounted under `/storeapi`)
pub fn storeapi_routes(state: Arc<StoreApiState>) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/register", get(register_handler))
        .route("/apps", get(list_apps_handler))
        .route("/apps/:id", get(app_detail_handler))
        .route("/search", get(search_handler))
        .route("/topchart", get(top_chart_handler))
        .route("/vote", post(vote_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Blank parameters count as absent
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    present(value)
        .ok_or_else(|| ApiError::bad_request(format!("Missing required parameter: {}", name)))
}

/// Supported APIs for an optional device identifier
fn device_context(conn: &Connection, device: Option<&str>) -> StoreResult<ApiSet> {
    match device {
        Some(identifier) => store::device_apis(conn, identifier),
        None => Ok(ApiSet::new()),
    }
}

/// Run a store operation on the blocking pool
async fn run_blocking<T, F>(state: &StoreApiState, action: &'static str, f: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
{
    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || store.with_conn(f)).await {
        Ok(result) => result.map_err(|e| ApiError::from_store(e, action)),
        Err(e) => {
            error!(action, error = %e, "store task failed");
            Err(ApiError::internal(action))
        }
    }
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

// ==================
// Handlers
// ==================

async fn version_handler() -> Json<&'static str> {
    Json(env!("CARGO_PKG_VERSION"))
}

async fn register_handler(
    State(state): State<Arc<StoreApiState>>,
    ApiQuery(query): ApiQuery<RegisterQuery>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let identifier = required(query.device, "device")?;
    let registration = DeviceRegistration {
        identifier: identifier.clone(),
        name: present(query.name),
        manufacturer: present(query.manufacturer),
        apis: query.jsrs.as_deref().map(ApiSet::parse),
    };

    let device = run_blocking(&state, "register device", move |conn| {
        store::register_device(conn, &registration)
    })
    .await?;

    info!(
        device = %identifier,
        id = device.id,
        created = device.created,
        linked_apis = device.linked_apis,
        "device registered"
    );

    let (status, message) = if device.created {
        (StatusCode::CREATED, "Device registered successfully")
    } else {
        (StatusCode::OK, "Device already registered")
    };

    Ok((
        status,
        Json(RegisterResponse {
            id: device.id,
            message: message.to_string(),
        }),
    ))
}

async fn list_apps_handler(
    State(state): State<Arc<StoreApiState>>,
    ApiQuery(query): ApiQuery<DeviceQuery>,
) -> ApiResult<Response> {
    let device = present(query.device);

    let body = run_blocking(&state, "fetch apps", move |conn| {
        let supported = device_context(conn, device.as_deref())?;
        let apps = store::list_apps(conn)?;
        debug!(count = apps.len(), "listing apps");
        Ok(csv::app_listing(&apps, &supported))
    })
    .await?;

    Ok(csv_response("apps.csv", body))
}

async fn app_detail_handler(
    State(state): State<Arc<StoreApiState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Response> {
    let id = raw_id
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid app id '{}'", raw_id)))?;

    let body = run_blocking(&state, "fetch app", move |conn| {
        let detail = store::app_detail(conn, id)?;
        Ok(csv::app_detail(&detail))
    })
    .await?;

    Ok(csv_response("app.csv", body))
}

async fn search_handler(
    State(state): State<Arc<StoreApiState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Response> {
    // Blank is missing, but a real query is matched untrimmed
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: q"))?;
    let device = present(query.device);

    let body = run_blocking(&state, "search apps", move |conn| {
        let supported = device_context(conn, device.as_deref())?;
        let apps = store::search_apps(conn, &q)?;
        debug!(query = %q, count = apps.len(), "search complete");
        Ok(csv::app_listing(&apps, &supported))
    })
    .await?;

    Ok(csv_response("apps.csv", body))
}

async fn top_chart_handler(
    State(state): State<Arc<StoreApiState>>,
    ApiQuery(query): ApiQuery<TopChartQuery>,
) -> ApiResult<Response> {
    let category = present(query.category);
    let device = present(query.device);

    let body = run_blocking(&state, "fetch top chart", move |conn| {
        let supported = device_context(conn, device.as_deref())?;
        let apps = store::top_chart(conn, category.as_deref())?;
        Ok(csv::app_listing(&apps, &supported))
    })
    .await?;

    Ok(csv_response("apps.csv", body))
}

async fn vote_handler(
    State(state): State<Arc<StoreApiState>>,
    ApiQuery(mut params): ApiQuery<VoteParams>,
    body: Bytes,
) -> ApiResult<Json<i64>> {
    if !body.is_empty() {
        let json: Value = serde_json::from_slice(&body)
            .map_err(|_| ApiError::bad_request("Request body must be JSON"))?;
        params.fill_from_json(&json);
    }

    let VoteRequest {
        app_id,
        device,
        direction,
    } = params.validate()?;

    let tallied = run_blocking(&state, "record vote", move |conn| {
        store::cast_vote(conn, app_id, &device, direction)
    })
    .await?;

    info!(
        app_id,
        direction = direction.as_str(),
        outcome = tallied.outcome.as_str(),
        votes = tallied.votes,
        "vote recorded"
    );

    Ok(Json(tallied.votes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(app_id: Option<&str>, device: Option<&str>, vote_type: Option<&str>) -> VoteParams {
        VoteParams {
            app_id: app_id.map(str::to_string),
            device: device.map(str::to_string),
            vote_type: vote_type.map(str::to_string),
        }
    }

    #[test]
    fn test_vote_params_validate() {
        let request = params(Some("1"), Some("dev-1"), Some("upvote"))
            .validate()
            .unwrap();
        assert_eq!(
            request,
            VoteRequest {
                app_id: 1,
                device: "dev-1".to_string(),
                direction: VoteDirection::Upvote,
            }
        );
    }

    #[test]
    fn test_vote_params_reject_bad_input() {
        let missing = params(None, Some("dev-1"), Some("upvote")).validate().unwrap_err();
        assert_eq!(missing.to_string(), "Missing required parameter: appId");

        let bad_id = params(Some("abc"), Some("dev-1"), Some("upvote")).validate().unwrap_err();
        assert_eq!(bad_id.status_code(), StatusCode::BAD_REQUEST);

        let blank_device = params(Some("1"), Some("  "), Some("upvote")).validate().unwrap_err();
        assert_eq!(blank_device.to_string(), "Missing required parameter: device");

        let bad_type = params(Some("1"), Some("dev-1"), Some("meh")).validate().unwrap_err();
        assert!(bad_type.to_string().contains("meh"));
    }

    #[test]
    fn test_fill_from_json_keeps_query_values() {
        let mut vote = params(Some("3"), Some("from-query"), None);
        vote.fill_from_json(&json!({
            "appId": 7,
            "device": "from-body",
            "voteType": "downvote"
        }));

        let request = vote.validate().unwrap();
        assert_eq!(request.app_id, 3);
        assert_eq!(request.device, "from-query");
        assert_eq!(request.direction, VoteDirection::Downvote);
    }

    #[test]
    fn test_fill_from_json_accepts_numeric_and_string_ids() {
        let mut numeric = VoteParams::default();
        numeric.fill_from_json(&json!({"appId": 7, "device": "d", "voteType": "upvote"}));
        assert_eq!(numeric.validate().unwrap().app_id, 7);

        let mut string = VoteParams::default();
        string.fill_from_json(&json!({"appId": "8", "device": "d", "voteType": "upvote"}));
        assert_eq!(string.validate().unwrap().app_id, 8);
    }

    #[test]
    fn test_present_treats_blank_as_absent() {
        assert_eq!(present(Some(" dev ".to_string())), Some("dev".to_string()));
        assert_eq!(present(Some("".to_string())), None);
        assert_eq!(present(None), None);
    }
}
