//! Listener settings
//!
//! Read from the `serve` config file alongside the database path; every
//! field may be omitted.

use serde::{Deserialize, Serialize};

/// Where the store API listens and which browser origins it accepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Interface address; "0.0.0.0" listens everywhere
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port, 3000 unless `PORT` or the config file says otherwise
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Left empty, any origin may call the API.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    3000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// `host:port`, as handed to the listener
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
