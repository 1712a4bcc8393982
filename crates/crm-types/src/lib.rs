//! Shared types for the crm-client workspace.
//!
//! This crate provides canonical definitions for data fetched from the CRM API.
//! These types are used across the workspace to avoid duplication:
//! - `crm-transport`: request routing per entity kind
//! - `crm-client`: list loaders and the fallback dataset generator
//!
//! ## Design Principles
//!
//! 1. **String IDs for JSON compatibility**: Record ids are `String` rather than
//!    a numeric type, since the API mixes string and numeric ids across resources.
//!
//! 2. **Defaulted fields for loosely-typed payloads**: Every field except `id`
//!    carries `#[serde(default)]` so a sparse server row still normalizes into a
//!    usable record. Only a missing identity discards a row.

pub mod entity;
pub mod page;

pub use entity::{Company, Contact, Deal, Entity, EntityKind};
pub use page::{normalize_item, Page};
