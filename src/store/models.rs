//! Row types returned by store queries.

use crate::matcher::{ApiRequirements, ApiSet, SupportStatus};
use crate::votes::VoteOutcome;

/// An app as shown in list, search and top-chart results
#[derive(Debug, Clone, PartialEq)]
pub struct AppSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub small_icon_url: String,
    pub download_url: String,
    pub is_featured: bool,
    pub requirements: ApiRequirements,
    pub votes: i64,
}

impl AppSummary {
    pub fn support_status(&self, device: &ApiSet) -> SupportStatus {
        self.requirements.status_for(device)
    }
}

/// Everything shown on an app's detail page
#[derive(Debug, Clone, PartialEq)]
pub struct AppDetail {
    pub id: i64,
    pub description: String,
    pub version: String,
    /// Size in KB
    pub size: f64,
    pub developer: Option<String>,
    pub category: Option<String>,
    pub votes: i64,
    /// Image URLs in insertion order
    pub screenshots: Vec<String>,
}

/// Input to device registration
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistration {
    pub identifier: String,
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    /// Reported APIs; `None` leaves existing associations untouched
    pub apis: Option<ApiSet>,
}

impl DeviceRegistration {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_apis(mut self, apis: ApiSet) -> Self {
        self.apis = Some(apis);
        self
    }
}

/// Result of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredDevice {
    pub id: i64,
    /// False when the identifier was already registered
    pub created: bool,
    /// Number of API associations stored (known names only)
    pub linked_apis: usize,
}

/// Result of a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalliedVote {
    /// App counter after the vote was applied
    pub votes: i64,
    pub outcome: VoteOutcome,
}
