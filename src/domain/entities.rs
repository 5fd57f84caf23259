//! Domain Entities - Core business objects
//!
//! These entities represent the core concepts of the geoloc domain.
//! They have no external dependencies and contain only business logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted geolocation record, keyed uniquely by IP address.
///
/// Records are created only through the enrichment pipeline and are
/// immutable after creation except for deletion; there is no update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geolocation {
    /// Storage-assigned identifier
    pub id: i64,
    /// Textual IPv4/IPv6 address, unique across all records
    pub ip_address: String,
    /// City name returned by the provider
    pub city: String,
    /// Country name returned by the provider
    pub country_name: String,
    /// Postal code returned by the provider
    pub zip: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Kept equal to created_at; records are never updated in place
    pub updated_at: DateTime<Utc>,
}

/// Creation payload handed to the record store by the pipeline.
///
/// Every field is required; the store rejects a record missing any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGeolocation {
    pub ip_address: String,
    pub city: String,
    pub country_name: String,
    pub zip: String,
}
