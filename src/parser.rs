//! HTML parsing for SPC web pages
//!
//! Each extractor targets one fragment of the page with its own pattern.
//! There is no DOM; the markup has no stable schema, so the less each
//! pattern depends on, the better.

use crate::error::{Error, Result};
use crate::models::Zone;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

// Page: any
static RE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title>([^<]+?)</title>").unwrap());

// Page: any after logging in
static RE_SERIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"S/N:\s*([0-9A-Za-z]+)").unwrap());
static RE_SESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\?|&)session=(0x[0-9A-Fa-f]+)").unwrap());

// Page: login
static RE_LOGIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\baction=login\b").unwrap());
static RE_DENIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAccess\s+denied\b").unwrap());

// Page: system_summary
static RE_ARM_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)>All Areas</td><td[^>]*>([^<]+)</td>").unwrap());
static RE_IMPORTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<font[^>]*color=red[^>]*><b>(.*?)</b></font>").unwrap());

// Page: status_zones
static RE_ZONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)<TR\s+HEIGHT=20>",
        // zone id, zone name
        r#"\s*<TD\s+ALIGN="center">(\d+)\s+([^<]+)</TD>"#,
        // area id, area name
        r#"\s*<TD\s+ALIGN="center">(\d+)\s+([^<]+)</TD>"#,
        // zone type
        r#"\s*<TD\s+ALIGN="center">([^<]+)</TD>"#,
        // input, commented out in the markup
        r".*?<!--.*?<font[^>]*>(?:<b>)?([^<]+)(?:</b>)?</font>.*?-->",
        // status
        r#"\s*<TD\s+ALIGN="center"><FONT\s+COLOR=\w+>(?:<B>)?([^<]+)(?:</B>)?</FONT></TD>"#,
    ))
    .unwrap()
});

/// Parse `(model, site)` from the page title, e.g. "SPC4000 - Front Office".
///
/// Falls back to an empty site when there is no separator and to two
/// empty strings when there is no title at all.
pub fn parse_title(html: &str) -> (String, String) {
    let Some(title) = RE_TITLE.captures(html).and_then(|c| c.get(1)) else {
        return (String::new(), String::new());
    };

    match title.as_str().split_once(" - ") {
        Some((model, site)) => (model.trim().to_string(), site.trim().to_string()),
        None => (title.as_str().trim().to_string(), String::new()),
    }
}

/// Serial number from the "S/N:" label, empty if the page has none
pub fn parse_serial_number(html: &str) -> String {
    RE_SERIAL
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Session token embedded in the page's links
pub fn parse_session_id(html: &str) -> Result<String> {
    RE_SESSION
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::Parse("Session ID not found in HTML".to_string()))
}

/// Arm state of all areas from the system_summary page, lower-cased
pub fn parse_arm_state(html: &str) -> Result<String> {
    RE_ARM_STATE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_lowercase())
        .ok_or_else(|| Error::Parse("Arm state not found in HTML".to_string()))
}

/// Red bold banner text, used by the panel to reject commands
pub fn parse_important_message(html: &str) -> Option<String> {
    RE_IMPORTANT
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|msg| !msg.is_empty())
}

/// All zones listed on the status_zones page, in document order.
///
/// Rows that don't look like zone rows are skipped. A zone id that shows
/// up twice keeps its first row.
pub fn parse_zones(html: &str) -> Vec<Zone> {
    let mut seen = HashSet::new();

    RE_ZONE
        .captures_iter(html)
        .filter_map(|caps| zone_from_captures(&caps))
        .filter(|zone| {
            let fresh = seen.insert(zone.zone_id);
            if !fresh {
                tracing::warn!("Duplicate zone id {} in zone table, skipping", zone.zone_id);
            }
            fresh
        })
        .collect()
}

fn zone_from_captures(caps: &Captures<'_>) -> Option<Zone> {
    let text = |i: usize| caps.get(i).map(|m| m.as_str().trim()).unwrap_or_default();

    Some(Zone {
        zone_id: text(1).parse().ok()?,
        zone_name: text(2).to_string(),
        area_id: text(3).parse().ok()?,
        area_name: text(4).to_string(),
        zone_type: text(5).to_lowercase(),
        input: text(6).to_lowercase(),
        status: text(7).to_lowercase(),
    })
}

pub fn is_login_page(html: &str) -> bool {
    RE_LOGIN.is_match(html)
}

pub fn is_access_denied(html: &str) -> bool {
    RE_DENIED.is_match(html)
}
