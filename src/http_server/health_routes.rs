//! Health HTTP Routes
//!
//! Liveness and welcome endpoints at the root of the server.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Create root-level routes (`/` and `/health`)
pub fn health_routes() -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn welcome_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Welcome to MIDlet API".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "OK".to_string(),
            message: "Server is running".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"OK","message":"Server is running"}"#);
    }
}
