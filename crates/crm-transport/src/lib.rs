//! CRM Transport Layer
//!
//! Turns the unreliable, bearer-authenticated CRM API into something the
//! list loaders can lean on:
//! - [`gateway`]: HTTP gateway that tags, authenticates, and classifies
//!   every outbound call
//! - [`session`]: process-wide session-expiry event channel
//! - [`retry`]: bounded retry with a fixed inter-attempt delay
//! - [`correlation`]: per-request correlation ids for cross-system tracing
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crm_transport::{ApiRequest, RequestGateway, SessionEventChannel};
//!
//! let session = SessionEventChannel::new();
//! let gateway = RequestGateway::new("https://api.example.com", session.clone());
//! let body = gateway.send(ApiRequest::get("/contacts").query("limit", "20"))?;
//! ```

pub mod correlation;
pub mod gateway;
pub mod retry;
pub mod session;

// Re-export main types for convenience
pub use correlation::{correlation_id, REQUEST_ID_HEADER};
pub use gateway::{
    ApiRequest, GatewayError, HttpBackend, Method, PreparedRequest, RequestGateway,
    StaticTokenProvider, TokenProvider, UreqBackend, LOGIN_PATH,
};
pub use retry::RetryPolicy;
pub use session::{SessionEvent, SessionEventChannel, SubscriberHandle};
