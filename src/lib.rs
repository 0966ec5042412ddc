//! midlet-store - app catalog backend for legacy MIDlet devices
//!
//! Serves the app catalog as CSV, computes per-device support status from
//! reported platform APIs, and tallies votes.

pub mod cli;
pub mod csv;
pub mod http_server;
pub mod matcher;
pub mod observability;
pub mod store;
pub mod votes;
