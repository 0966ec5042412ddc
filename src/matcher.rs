//! Capability matching
//!
//! Computes an app's support status relative to the APIs a device reports.
//! API lists arrive as comma-separated text (both from the `apps` table and
//! from device registration) and are parsed once into an [`ApiSet`].

use std::collections::BTreeSet;
use std::fmt;

/// A set of platform API names such as `JSR75`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSet {
    names: BTreeSet<String>,
}

impl ApiSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list.
    ///
    /// Entries are trimmed and empty entries are discarded, so `" JSR75,,JSR82 "`
    /// yields `{JSR75, JSR82}` and `""` yields the empty set.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// True when every name in `self` is also in `other`
    pub fn is_subset(&self, other: &ApiSet) -> bool {
        self.names.is_subset(&other.names)
    }
}

impl<S: Into<String>> FromIterator<S> for ApiSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ApiSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.names {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Support status of an app on a particular device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportStatus {
    /// Device has every API the app uses
    FullySupported,
    /// Device has the app's minimum APIs but not everything it uses
    PartiallySupported,
    /// Device lacks at least one minimum API
    NotSupported,
    /// No device context
    Unknown,
}

impl SupportStatus {
    /// Wire literal sent to clients
    pub fn as_str(&self) -> &'static str {
        match self {
            SupportStatus::FullySupported => "fully_supported",
            SupportStatus::PartiallySupported => "partially_supported",
            SupportStatus::NotSupported => "not_supported",
            SupportStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SupportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The API lists an app declares
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequirements {
    /// APIs the app cannot run without
    pub minimum: ApiSet,
    /// Every API the app touches
    pub used: ApiSet,
}

impl ApiRequirements {
    /// Parse the delimited `minimum_apis` / `used_apis` columns
    pub fn parse(minimum: &str, used: &str) -> Self {
        Self {
            minimum: ApiSet::parse(minimum),
            used: ApiSet::parse(used),
        }
    }

    pub fn status_for(&self, device: &ApiSet) -> SupportStatus {
        match_support(&self.minimum, &self.used, device)
    }
}

/// Classify an app against a device's supported APIs.
///
/// An empty device set means there is no device context and always yields
/// [`SupportStatus::Unknown`]. Otherwise the used-API check runs first, so an
/// app whose used list is covered is fully supported even if the minimum list
/// would also match.
pub fn match_support(minimum: &ApiSet, used: &ApiSet, device: &ApiSet) -> SupportStatus {
    if device.is_empty() {
        return SupportStatus::Unknown;
    }

    if used.is_subset(device) {
        SupportStatus::FullySupported
    } else if minimum.is_subset(device) {
        SupportStatus::PartiallySupported
    } else {
        SupportStatus::NotSupported
    }
}
