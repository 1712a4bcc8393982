//! Resilient client data-access layer for the CRM API.
//!
//! Combines the transport stack from `crm-transport` with per-entity-kind
//! list loaders that degrade to deterministic synthetic data when the
//! backend is unreachable:
//! - [`loader`]: cursor-paginated list loading with an explicit two-state
//!   in-flight guard
//! - [`fallback`]: deterministic offline dataset generation and local
//!   query filtering
//! - [`recovery`]: bounded-retry call sites for the account recovery flows
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crm_client::loader::PagedListLoader;
//! use crm_client_types::Contact;
//! use crm_transport::{RequestGateway, SessionEventChannel};
//!
//! let session = SessionEventChannel::new();
//! let gateway = Arc::new(RequestGateway::new("https://api.example.com", session));
//! let mut contacts: PagedListLoader<Contact> = PagedListLoader::new(gateway);
//! contacts.load(true);
//! while contacts.next_cursor().is_some() {
//!     contacts.more();
//! }
//! ```

pub mod fallback;
pub mod loader;
pub mod recovery;

pub use fallback::{fallback_page, filter_by_query, FALLBACK_PAGE_SIZE};
pub use loader::{LoadPhase, PagedListLoader, FALLBACK_ERROR_MESSAGE};
