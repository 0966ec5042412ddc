//! # MIDlet Store HTTP Server Module
//!
//! Axum server exposing the store API to MIDlet clients.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/storeapi/version` - API version probe
//! - `/storeapi/register` - Device registration
//! - `/storeapi/apps`, `/storeapi/apps/:id` - Catalog (CSV)
//! - `/storeapi/search`, `/storeapi/topchart` - Catalog queries (CSV)
//! - `/storeapi/vote` - Voting

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod storeapi_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiQuery, ApiResult};
pub use server::HttpServer;
