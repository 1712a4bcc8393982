//! CRM read models and the `Entity` trait.
//!
//! The three list views (contacts, companies, deals) share one loader
//! implementation; everything the loader needs to know about a concrete
//! record type lives behind [`Entity`]:
//! - which REST collection to query ([`EntityKind::resource_path`]),
//! - what text to match local query filters against ([`Entity::search_text`]),
//! - how to synthesize a deterministic placeholder record for a given
//!   absolute dataset position ([`Entity::placeholder`]).
//!
//! Placeholder values are derived arithmetically from the position, never
//! from a random source, so the same position always yields the same record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The entity kinds served by the CRM list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Contact,
    Company,
    Deal,
}

impl EntityKind {
    /// REST collection path for this kind, relative to the API base URL.
    pub fn resource_path(&self) -> &'static str {
        match self {
            EntityKind::Contact => "/contacts",
            EntityKind::Company => "/companies",
            EntityKind::Deal => "/deals",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Contact => "contact",
            EntityKind::Company => "company",
            EntityKind::Deal => "deal",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type the paged list loaders can drive.
pub trait Entity: DeserializeOwned + Serialize + Clone {
    /// The kind this record type belongs to.
    fn kind() -> EntityKind;

    /// Concatenated display fields, used for case-insensitive substring
    /// filtering of locally generated records.
    fn search_text(&self) -> String;

    /// Deterministic synthetic record for absolute dataset position
    /// `position`. Identical positions always yield identical records.
    fn placeholder(position: u64) -> Self;
}

/// A person record from `/contacts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
}

impl Entity for Contact {
    fn kind() -> EntityKind {
        EntityKind::Contact
    }

    fn search_text(&self) -> String {
        format!("{} {} {} {}", self.name, self.email, self.phone, self.company)
    }

    fn placeholder(position: u64) -> Self {
        Self {
            id: format!("contact-{position}"),
            name: format!("Contact {position}"),
            email: format!("contact{position}@example.com"),
            phone: format!("+1-555-{:04}", position % 10_000),
            company: format!("Company {}", position % 7),
        }
    }
}

/// An organization record from `/companies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub employee_count: u64,
}

const CITIES: [&str; 5] = ["Berlin", "Lisbon", "Austin", "Toronto", "Osaka"];

impl Entity for Company {
    fn kind() -> EntityKind {
        EntityKind::Company
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.domain, self.city)
    }

    fn placeholder(position: u64) -> Self {
        Self {
            id: format!("company-{position}"),
            name: format!("Company {position}"),
            domain: format!("company{position}.example.com"),
            city: CITIES[(position as usize) % CITIES.len()].to_string(),
            employee_count: 5 + (position % 40) * 3,
        }
    }
}

/// A pipeline record from `/deals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount_cents: u64,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub contact_id: String,
}

const STAGES: [&str; 5] = ["lead", "qualified", "proposal", "won", "lost"];

impl Entity for Deal {
    fn kind() -> EntityKind {
        EntityKind::Deal
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.stage, self.contact_id)
    }

    fn placeholder(position: u64) -> Self {
        Self {
            id: format!("deal-{position}"),
            title: format!("Deal {position}"),
            // Positions come from untrusted numeric-looking cursors and may
            // sit at the top of the u64 range; saturate instead of panicking.
            amount_cents: position.saturating_mul(1_250).saturating_add(5_000),
            stage: STAGES[(position as usize) % STAGES.len()].to_string(),
            contact_id: format!("contact-{}", position % 50),
        }
    }
}
