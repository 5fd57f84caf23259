//! In-Memory Geolocation Repository
//!
//! Implements GeolocationRepository using DashMap. Used by tests and
//! ephemeral runs where nothing needs to survive a restart.

use crate::domain::entities::{Geolocation, NewGeolocation};
use crate::domain::ports::{GeolocationRepository, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// DashMap-backed geolocation record store.
pub struct MemoryGeolocationRepository {
    /// Records by id
    records: DashMap<i64, Geolocation>,
    next_id: AtomicI64,
}

impl MemoryGeolocationRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(0),
        }
    }
}

impl Default for MemoryGeolocationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeolocationRepository for MemoryGeolocationRepository {
    async fn exists(&self, ip_address: &str) -> Result<bool, StoreError> {
        Ok(self
            .records
            .iter()
            .any(|entry| entry.ip_address == ip_address))
    }

    async fn insert(&self, record: NewGeolocation) -> Result<Geolocation, StoreError> {
        // check-then-insert is not atomic; the SQLite adapter is the
        // authoritative store under concurrency
        if self.exists(&record.ip_address).await? {
            return Err(StoreError::UniqueViolation);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let created = Geolocation {
            id,
            ip_address: record.ip_address,
            city: record.city,
            country_name: record.country_name,
            zip: record.zip,
            created_at: now,
            updated_at: now,
        };

        self.records.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Geolocation>, StoreError> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn all(&self) -> Result<Vec<Geolocation>, StoreError> {
        let mut records: Vec<Geolocation> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}
