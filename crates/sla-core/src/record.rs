//! Decoding of Notion database pages into the three fields the synchronizer reads.
//!
//! Property lookups never fail: a missing property, a property of an
//! unexpected type, or an empty select all decode to `None`.

use crate::config::PropertyNames;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Page (wire shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub status: Option<String>,
    /// Raw `date.start` value, parsed lazily by the classifier.
    pub due: Option<String>,
    pub sla: Option<String>,
}

impl Record {
    pub fn from_page(page: &Page, names: &PropertyNames) -> Self {
        let prop = |name: &str| page.properties.get(name);
        Self {
            id: page.id.clone(),
            status: prop(&names.status).and_then(|p| nested_str(p, "status", "name")),
            due: prop(&names.due).and_then(|p| nested_str(p, "date", "start")),
            sla: prop(&names.sla).and_then(|p| nested_str(p, "select", "name")),
        }
    }
}

fn nested_str(prop: &Value, outer: &str, inner: &str) -> Option<String> {
    prop.get(outer)?
        .get(inner)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Due
// ---------------------------------------------------------------------------

/// A parsed `date.start` value. Zone resolution happens in the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    /// `2024-01-10` — midnight in the configured zone.
    Date(NaiveDate),
    /// `2024-01-10T09:00` — wall-clock time in the configured zone.
    Local(NaiveDateTime),
    /// `2024-01-10T09:00:00.000+03:00` — an absolute instant.
    Instant(DateTime<FixedOffset>),
}

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl Due {
    pub fn parse(raw: &str) -> Option<Due> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(Due::Instant(dt));
        }
        for fmt in LOCAL_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(Due::Local(dt));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(Due::Date)
    }
}
