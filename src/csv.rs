//! CSV rendering for MIDlet clients
//!
//! Clients split lines on plain commas, so field values are written verbatim
//! with no quoting or escaping. A comma or newline inside a name or
//! description will shift the client's columns.

use std::fmt::Write;

use crate::matcher::ApiSet;
use crate::store::{AppDetail, AppSummary};

/// Header line of the app detail document
pub const APP_DETAIL_HEADER: &str = "description,version,size,developer,category,votes,screenshots";

/// One list line:
/// `id,name,description,smallIconUrl,downloadUrl,isFeatured,supportStatus,votes`
pub fn app_row(app: &AppSummary, device: &ApiSet) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        app.id,
        app.name,
        app.description,
        app.small_icon_url,
        app.download_url,
        app.is_featured,
        app.support_status(device),
        app.votes
    )
}

/// List document: one newline-terminated line per app, no header.
pub fn app_listing(apps: &[AppSummary], device: &ApiSet) -> String {
    let mut out = String::with_capacity(apps.len() * 128);
    for app in apps {
        out.push_str(&app_row(app, device));
        out.push('\n');
    }
    out
}

/// Detail document: header line plus one data line.
///
/// Missing developer/category become empty fields; screenshots are joined
/// with commas into the last field.
pub fn app_detail(detail: &AppDetail) -> String {
    let mut out = String::with_capacity(APP_DETAIL_HEADER.len() + 256);
    out.push_str(APP_DETAIL_HEADER);
    out.push('\n');
    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "{},{},{},{},{},{},{}",
        detail.description,
        detail.version,
        detail.size,
        detail.developer.as_deref().unwrap_or(""),
        detail.category.as_deref().unwrap_or(""),
        detail.votes,
        detail.screenshots.join(",")
    );
    out
}
