//! Boundary schema for the feed payloads.
//!
//! The live endpoint answers with an object, the history endpoint with an
//! array. The shape is decided once here; everything downstream works on
//! [`ParsedFeedRecord`] and never inspects raw JSON.

use metrics::counter;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AlertsError, Result};
use crate::telemetry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFeedRecord {
    Live(LiveRecord),
    History(HistoryRecord),
}

/// Live alert object. No `data` field parses to [`LiveRecord::empty`];
/// a present `data` list, even an empty one, is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LiveRecord {
    #[serde(rename = "cat", default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(rename = "desc", default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "locality_list")]
    pub data: Option<Vec<String>>,
}

impl LiveRecord {
    /// No active alert.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRecord {
    pub entries: Vec<HistoryEntry>,
}

/// One history row. Missing fields come through as empty strings so the
/// normalizer can skip the row instead of failing the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "alertDate", default, deserialize_with = "lenient_string")]
    alert_date_raw: Option<String>,
    #[serde(rename = "category", default, deserialize_with = "lenient_string")]
    category_raw: Option<String>,
    #[serde(rename = "data", default, deserialize_with = "lenient_string")]
    data_raw: Option<String>,
}

impl HistoryEntry {
    pub fn new(alert_date: &str, category: &str, data: &str) -> Self {
        Self {
            alert_date_raw: Some(alert_date.to_string()),
            category_raw: Some(category.to_string()),
            data_raw: Some(data.to_string()),
        }
    }

    pub fn alert_date(&self) -> &str {
        self.alert_date_raw.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.category_raw.as_deref().unwrap_or_default()
    }

    pub fn data(&self) -> &str {
        self.data_raw.as_deref().unwrap_or_default()
    }
}

/// The history feed sends `category` as a number, the live feed sends `cat`
/// as a string; accept both and keep the text form.
fn lenient_string<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }
    Ok(Option::<Raw>::deserialize(d)?.map(|r| match r {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}

/// `null` list entries carry nothing and are dropped; `data: null` counts as absent.
fn locality_list<'de, D>(d: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<String>>>::deserialize(d)?
        .map(|items| items.into_iter().flatten().collect()))
}

/// Convert history rows one by one; a malformed row is skipped, not fatal.
fn history_entries(rows: Vec<Value>) -> Vec<HistoryEntry> {
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<HistoryEntry>(row) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!(
                    target: "oref_alerts::history",
                    error = %e,
                    "malformed history row, skipping"
                );
                counter!(telemetry::HISTORY_ROWS_SKIPPED_TOTAL, "reason" => "malformed")
                    .increment(1);
            }
        }
    }
    entries
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse decoded feed text. Empty text is a valid "no alert" answer.
pub fn parse_feed(text: &str) -> Result<ParsedFeedRecord> {
    if text.trim().is_empty() {
        return Ok(ParsedFeedRecord::Live(LiveRecord::empty()));
    }

    let value: Value = serde_json::from_str(text).map_err(|e| AlertsError::parse(e, text))?;

    match value {
        Value::Array(rows) => Ok(ParsedFeedRecord::History(HistoryRecord {
            entries: history_entries(rows),
        })),
        Value::Object(_) => {
            let live: LiveRecord =
                serde_json::from_value(value).map_err(|e| AlertsError::parse(e, text))?;
            Ok(ParsedFeedRecord::Live(live))
        }
        other => Err(AlertsError::parse(
            format!("unexpected top-level JSON {}", json_kind(&other)),
            text,
        )),
    }
}
