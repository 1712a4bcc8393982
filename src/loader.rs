//! Cursor-paginated list loading with offline degradation.
//!
//! One [`PagedListLoader`] per list view, created on mount and discarded on
//! unmount; nothing here persists across the process. The loader exposes
//! the uniform `{rows, loading, error, cursor, next_cursor}` contract the
//! screens bind to, and guarantees a failure never reaches the view as an
//! error: the failure branch swaps in deterministic fallback records and
//! surfaces a non-fatal message string instead.
//!
//! The in-flight guard is an explicit two-state machine ([`LoadPhase`]):
//! at most one `load`/`more` is logically in flight per loader, and a new
//! call while `InFlight` is ignored outright.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crm_client_types::{normalize_item, Entity, Page};
use crm_transport::RequestGateway;

use crate::fallback::{fallback_page, filter_by_query, FALLBACK_PAGE_SIZE};

/// Surfaced on every fallback so the view can tell the user data is not
/// live.
pub const FALLBACK_ERROR_MESSAGE: &str = "Backend unavailable. Showing fallback mock data.";

/// Items requested per live page.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// In-flight guard state. `Idle -> InFlight` on an accepted `load`/`more`,
/// back to `Idle` in the final step of every outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    InFlight,
}

/// Per-entity-kind list controller over [`RequestGateway`] with
/// deterministic offline fallback.
pub struct PagedListLoader<T: Entity> {
    gateway: Arc<RequestGateway>,
    rows: Vec<T>,
    phase: LoadPhase,
    error: String,
    cursor: Option<String>,
    next_cursor: Option<String>,
    query: String,
    limit: usize,
}

impl<T: Entity> PagedListLoader<T> {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self::with_limit(gateway, DEFAULT_PAGE_LIMIT)
    }

    pub fn with_limit(gateway: Arc<RequestGateway>, limit: usize) -> Self {
        Self {
            gateway,
            rows: Vec::new(),
            phase: LoadPhase::Idle,
            error: String::new(),
            cursor: None,
            next_cursor: None,
            query: String::new(),
            limit,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::InFlight
    }

    /// Empty when the last completed load was live.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rebind the search query. Takes effect on the next `load`; callers
    /// reset after changing it.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Fetch one page. Ignored while a call is already in flight.
    ///
    /// `reset` clears all pagination state before the call and asks the
    /// server for the first page; otherwise the current cursor is echoed
    /// verbatim. On failure the loader degrades to fallback records and
    /// never propagates the error.
    pub fn load(&mut self, reset: bool) {
        if self.phase == LoadPhase::InFlight {
            return;
        }
        self.phase = LoadPhase::InFlight;

        if reset {
            self.rows.clear();
            self.cursor = None;
            self.next_cursor = None;
        }
        let cursor = self.cursor.clone();

        let result = self
            .gateway
            .fetch_list(T::kind(), &self.query, cursor.as_deref(), self.limit);
        match result {
            Ok(body) => self.apply_page(&body),
            Err(err) => {
                warn!(kind = %T::kind(), error = %err, "list fetch failed, serving fallback");
                self.apply_fallback(reset, cursor.as_deref());
            }
        }

        // Always the final step, regardless of outcome.
        self.phase = LoadPhase::Idle;
    }

    /// Fetch the next page. No-op while in flight or when the server has
    /// said there are no further pages.
    pub fn more(&mut self) {
        if self.phase == LoadPhase::InFlight || self.next_cursor.is_none() {
            return;
        }
        self.load(false);
    }

    fn apply_page(&mut self, body: &Value) {
        let page = Page::from_body(body);
        let received = page.items.len();
        let normalized: Vec<T> = page
            .items
            .into_iter()
            .filter_map(normalize_item)
            .collect();
        if normalized.len() < received {
            debug!(
                kind = %T::kind(),
                dropped = received - normalized.len(),
                "dropped rows without a resolvable identity"
            );
        }

        self.rows.extend(normalized);
        self.cursor = page.next_cursor.clone();
        self.next_cursor = page.next_cursor;
        self.error.clear();
    }

    fn apply_fallback(&mut self, reset: bool, cursor: Option<&str>) {
        let offset = if reset {
            0
        } else {
            // A real (opaque) server cursor won't parse; restart the
            // fallback dataset from the top in that case.
            cursor.and_then(|c| c.parse::<u64>().ok()).unwrap_or(0)
        };

        let generated: Vec<T> = fallback_page(offset, FALLBACK_PAGE_SIZE);
        let produced = generated.len() as u64;
        let filtered = filter_by_query(generated, &self.query);
        self.rows.extend(filtered);

        let next = if produced > 0 {
            Some(offset.saturating_add(produced).to_string())
        } else {
            None
        };
        self.cursor = next.clone();
        self.next_cursor = next;
        self.error = FALLBACK_ERROR_MESSAGE.to_string();
    }
}
