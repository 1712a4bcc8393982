//! Per-request correlation ids.
//!
//! Every outbound call carries an `X-Request-Id` header so failures can be
//! traced across the client, the API edge, and downstream services. The
//! gateway attaches one only when the caller has not already supplied it; a
//! call retried as a unit keeps the id of its first attempt.

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Generate a fresh correlation id (hyphenated UUID v4).
pub fn correlation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
