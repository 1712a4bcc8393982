//! Cursor-paginated list payloads and identity normalization.
//!
//! List endpoints return `{ items: [...], nextCursor: "..." | null }`. The
//! cursor is opaque to the client: it is echoed back verbatim on the next
//! request and never parsed or constructed here. A missing/`null`
//! `nextCursor` means no further pages exist; it is never inferred from the
//! item count.
//!
//! Server rows are loosely typed. [`normalize_item`] is the single place
//! identity resolution happens: it tries the common id fields in order,
//! rewrites the winner under `id`, and returns `None` (never an error) when
//! no identity can be resolved. All loaders consume it uniformly, so a row
//! without a resolvable identity can never reach the UI.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(rename = "nextCursor", default)]
    pub next_cursor: Option<String>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self { items: Vec::new(), next_cursor: None }
    }
}

impl Page<Value> {
    /// Parse a raw list response body into an untyped page.
    ///
    /// Tolerant of partial payloads: a missing `items` array yields an empty
    /// page, a `null` or missing `nextCursor` yields `None`. Any present
    /// cursor string round-trips verbatim.
    pub fn from_body(body: &Value) -> Self {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let next_cursor = body
            .get("nextCursor")
            .and_then(Value::as_str)
            .map(String::from);
        Self { items, next_cursor }
    }
}

/// Id fields tried in order when resolving a row's identity.
const ID_FIELDS: [&str; 3] = ["id", "_id", "uuid"];

/// Normalize one raw server row into a typed record.
///
/// Resolves an identity by trying `id`, `_id`, then `uuid` (strings must be
/// non-empty; numbers are stringified), writes the winner back under `id`,
/// and deserializes. Returns `None` when no identity resolves or the row
/// does not fit `T`; never panics or errors.
pub fn normalize_item<T: DeserializeOwned>(mut raw: Value) -> Option<T> {
    let obj = raw.as_object_mut()?;
    let id = ID_FIELDS.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })?;
    obj.insert("id".to_string(), Value::String(id));
    serde_json::from_value(raw).ok()
}
