//! Geolocation Repository Port
//!
//! Defines the interface for the persisted record store.
//! Implementations may use SQLite or in-memory storage.

use crate::domain::entities::{Geolocation, NewGeolocation};
use async_trait::async_trait;

/// Failure surfaced by the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with the same ip_address already exists. The store's
    /// uniqueness index is the authoritative guard; the pipeline's
    /// pre-check can lose a race to a concurrent insert.
    #[error("ip_address has already been taken")]
    UniqueViolation,
    /// Any other storage fault (I/O, corruption, pool shutdown).
    #[error("storage error: {0}")]
    Backend(String),
}

/// Repository for persisted geolocation records.
///
/// This is an outbound port that abstracts the storage mechanism.
/// Uniqueness is enforced on `ip_address`; records are keyed by id.
#[async_trait]
pub trait GeolocationRepository: Send + Sync {
    /// Whether a record with this textual IP address exists.
    async fn exists(&self, ip_address: &str) -> Result<bool, StoreError>;

    /// Insert a new record, assigning id and timestamps.
    async fn insert(&self, record: NewGeolocation) -> Result<Geolocation, StoreError>;

    /// Get a record by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Geolocation>, StoreError>;

    /// Delete a record by id. Returns false when the id is unknown.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// All records, in insertion order.
    async fn all(&self) -> Result<Vec<Geolocation>, StoreError>;
}
