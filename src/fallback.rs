//! Deterministic fallback dataset generation.
//!
//! When the real endpoint is unreachable a loader serves synthetic records
//! instead of an empty screen. Generation is a pure function of
//! `(entity kind, offset, count)`: the record at absolute dataset position
//! `p` is always `T::placeholder(p)`, with every field derived
//! arithmetically from `p`. Identical inputs yield structurally identical
//! output, which keeps offline pagination stable and tests deterministic.
//!
//! The offset-as-cursor convention (`"25"`, `"50"`, ...) is private to this
//! fallback path; real server cursors stay opaque.

use crm_client_types::Entity;

/// Records per fallback page. Fixed, independent of the caller's live-page
/// limit.
pub const FALLBACK_PAGE_SIZE: usize = 25;

/// Generate `count` synthetic records starting at absolute position
/// `offset`.
///
/// Positions saturate at `u64::MAX`: the offset comes from parsing a server
/// cursor that merely looks numeric, so arbitrarily large values are valid
/// input and must not panic.
pub fn fallback_page<T: Entity>(offset: u64, count: usize) -> Vec<T> {
    (0..count as u64)
        .map(|i| T::placeholder(offset.saturating_add(i)))
        .collect()
}

/// Keep records whose search text contains `query`, case-insensitively.
/// An empty query keeps everything.
pub fn filter_by_query<T: Entity>(rows: Vec<T>, query: &str) -> Vec<T> {
    if query.is_empty() {
        return rows;
    }
    let needle = query.to_lowercase();
    rows.into_iter()
        .filter(|row| row.search_text().to_lowercase().contains(&needle))
        .collect()
}
