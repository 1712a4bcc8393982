//! Loader state-machine behavior: pagination, normalization, and offline
//! fallback.

mod common;

use std::sync::Arc;

use serde_json::json;

use common::{gateway_with, FakeBackend, Scripted};
use crm_client::fallback::FALLBACK_PAGE_SIZE;
use crm_client::loader::{PagedListLoader, FALLBACK_ERROR_MESSAGE};
use crm_client_types::Contact;

fn contact_loader(backend: &FakeBackend) -> PagedListLoader<Contact> {
    let (gateway, _) = gateway_with(backend);
    PagedListLoader::new(Arc::new(gateway))
}

#[test]
fn test_reset_load_replaces_state() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({"items": [{"id": "a"}], "nextCursor": "c1"})));
    let mut loader = contact_loader(&backend);

    loader.load(true);

    assert_eq!(loader.rows().len(), 1);
    assert_eq!(loader.rows()[0].id, "a");
    assert_eq!(loader.next_cursor(), Some("c1"));
    assert_eq!(loader.error(), "");
    assert!(!loader.is_loading());
}

#[test]
fn test_more_appends_and_exhausts() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({"items": [{"id": "a"}], "nextCursor": "c1"})));
    backend.push(Scripted::Ok(json!({"items": [{"id": "b"}], "nextCursor": null})));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    loader.more();

    let ids: Vec<&str> = loader.rows().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(loader.next_cursor(), None);

    // Exhausted: further more() calls never reach the backend.
    loader.more();
    assert_eq!(backend.request_count(), 2);
}

#[test]
fn test_more_echoes_server_cursor_verbatim() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({"items": [], "nextCursor": "eyJvZmY6NTB9"})));
    backend.push(Scripted::Ok(json!({"items": [], "nextCursor": null})));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    loader.more();

    let requests = backend.requests();
    assert!(!requests[0].url.contains("cursor="));
    assert!(requests[1].url.contains("cursor=eyJvZmY6NTB9"));
}

#[test]
fn test_reset_supersedes_prior_rows() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({"items": [{"id": "a"}, {"id": "b"}], "nextCursor": "c1"})));
    backend.push(Scripted::Ok(json!({"items": [{"id": "z"}], "nextCursor": null})));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    loader.load(true);

    let ids: Vec<&str> = loader.rows().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["z"]);
    // The second reset must not send the first page's cursor.
    assert!(!backend.requests()[1].url.contains("cursor="));
}

#[test]
fn test_rows_without_identity_are_dropped() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({
        "items": [
            {"id": "a"},
            {"name": "no identity"},
            {"_id": "m-1"},
            {"uuid": "u-1"},
            {"id": 7},
        ],
        "nextCursor": null,
    })));
    let mut loader = contact_loader(&backend);

    loader.load(true);

    let ids: Vec<&str> = loader.rows().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "m-1", "u-1", "7"]);
}

#[test]
fn test_reset_failure_serves_deterministic_fallback() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Transport("connection refused"));
    let mut loader = contact_loader(&backend);

    loader.load(true);

    assert_eq!(loader.rows().len(), FALLBACK_PAGE_SIZE);
    assert_eq!(loader.rows()[0].id, "contact-0");
    assert_eq!(loader.rows()[24].id, "contact-24");
    assert_eq!(loader.next_cursor(), Some("25"));
    assert_eq!(loader.error(), FALLBACK_ERROR_MESSAGE);
}

#[test]
fn test_offline_more_advances_fallback_window() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Transport("connection refused"));
    backend.push(Scripted::Transport("connection refused"));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    loader.more();

    assert_eq!(loader.rows().len(), 2 * FALLBACK_PAGE_SIZE);
    assert_eq!(loader.rows()[25].id, "contact-25");
    assert_eq!(loader.rows()[49].id, "contact-49");
    assert_eq!(loader.next_cursor(), Some("50"));
}

#[test]
fn test_fallback_filters_by_query() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Transport("connection refused"));
    let mut loader = contact_loader(&backend);
    loader.set_query("contact 7");

    loader.load(true);

    assert_eq!(loader.rows().len(), 1);
    assert_eq!(loader.rows()[0].id, "contact-7");
    // Cursor advances by the produced window, not the filtered count.
    assert_eq!(loader.next_cursor(), Some("25"));
    assert_eq!(loader.error(), FALLBACK_ERROR_MESSAGE);
}

#[test]
fn test_unparsable_server_cursor_restarts_fallback_at_zero() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({"items": [{"id": "a"}], "nextCursor": "c1"})));
    backend.push(Scripted::Status(503, None));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    loader.more();

    // Live row kept, fallback appended starting at position 0.
    assert_eq!(loader.rows()[0].id, "a");
    assert_eq!(loader.rows()[1].id, "contact-0");
    assert_eq!(loader.rows().len(), 1 + FALLBACK_PAGE_SIZE);
    assert_eq!(loader.error(), FALLBACK_ERROR_MESSAGE);
}

#[test]
fn test_huge_numeric_cursor_degrades_without_panicking() {
    // A server cursor is opaque; one that happens to parse as a giant
    // number must not blow up the offline window arithmetic.
    let backend = FakeBackend::new();
    backend.push(Scripted::Ok(json!({
        "items": [{"id": "a"}],
        "nextCursor": u64::MAX.to_string(),
    })));
    backend.push(Scripted::Status(503, None));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    loader.more();

    assert_eq!(loader.rows().len(), 1 + FALLBACK_PAGE_SIZE);
    assert_eq!(loader.rows()[1].id, format!("contact-{}", u64::MAX));
    assert_eq!(loader.next_cursor(), Some(u64::MAX.to_string().as_str()));
    assert_eq!(loader.error(), FALLBACK_ERROR_MESSAGE);
}

#[test]
fn test_recovery_clears_error() {
    let backend = FakeBackend::new();
    backend.push(Scripted::Transport("connection refused"));
    backend.push(Scripted::Ok(json!({"items": [{"id": "live"}], "nextCursor": null})));
    let mut loader = contact_loader(&backend);

    loader.load(true);
    assert_eq!(loader.error(), FALLBACK_ERROR_MESSAGE);

    loader.load(true);
    assert_eq!(loader.error(), "");
    assert_eq!(loader.rows().len(), 1);
    assert_eq!(loader.rows()[0].id, "live");
}

#[test]
fn test_more_is_noop_without_cursor() {
    let backend = FakeBackend::new();
    let mut loader = contact_loader(&backend);

    loader.more();

    assert_eq!(backend.request_count(), 0);
    assert!(loader.rows().is_empty());
    assert_eq!(loader.error(), "");
}
