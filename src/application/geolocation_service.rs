//! Geolocation Service - main application use case
//!
//! Thin facade over the enrichment pipeline and the record store. This is
//! the primary interface for the inbound HTTP adapter.

use crate::application::EnrichmentPipeline;
use crate::domain::entities::Geolocation;
use crate::domain::ports::{AddressResolver, GeolocationLookup, GeolocationRepository, StoreError};
use crate::domain::value_objects::ValidationErrors;
use std::sync::Arc;

/// Result of one creation attempt.
#[derive(Debug)]
pub enum CreateOutcome {
    /// The record was validated and persisted.
    Created(Geolocation),
    /// The record was rejected; the error set explains why.
    Invalid(ValidationErrors),
}

/// Geolocation service - orchestrates record creation and access.
pub struct GeolocationService {
    resolver: Arc<dyn AddressResolver>,
    lookup: Arc<dyn GeolocationLookup>,
    store: Arc<dyn GeolocationRepository>,
}

impl GeolocationService {
    /// Create a new geolocation service.
    pub fn new(
        resolver: Arc<dyn AddressResolver>,
        lookup: Arc<dyn GeolocationLookup>,
        store: Arc<dyn GeolocationRepository>,
    ) -> Self {
        Self {
            resolver,
            lookup,
            store,
        }
    }

    /// Resolve, enrich, validate, and persist one address.
    ///
    /// Validation failures (including a lost uniqueness race at insert
    /// time) come back as [`CreateOutcome::Invalid`]; only unexpected
    /// store faults surface as errors.
    pub async fn create(&self, address: &str) -> Result<CreateOutcome, StoreError> {
        let mut pipeline = EnrichmentPipeline::prepare(
            address,
            &*self.resolver,
            &*self.lookup,
            &*self.store,
        )
        .await?;

        match pipeline.save(&*self.store).await? {
            Some(record) => {
                tracing::info!(
                    "created geolocation id={} ip={}",
                    record.id,
                    record.ip_address
                );
                Ok(CreateOutcome::Created(record))
            }
            None => {
                tracing::debug!("rejected geolocation for address {:?}", address);
                Ok(CreateOutcome::Invalid(pipeline.errors().clone()))
            }
        }
    }

    /// All persisted records, in insertion order.
    pub async fn list(&self) -> Result<Vec<Geolocation>, StoreError> {
        self.store.all().await
    }

    /// Get one record by id.
    pub async fn get(&self, id: i64) -> Result<Option<Geolocation>, StoreError> {
        self.store.find_by_id(id).await
    }

    /// Delete one record by id. Returns false when the id is unknown.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::MemoryGeolocationRepository;
    use crate::domain::value_objects::LookupOutcome;
    use async_trait::async_trait;
    use std::net::IpAddr;

    struct LiteralResolver;

    #[async_trait]
    impl AddressResolver for LiteralResolver {
        async fn resolve(&self, address: &str) -> Option<IpAddr> {
            address.trim().parse().ok()
        }
    }

    struct FixedLookup(LookupOutcome);

    #[async_trait]
    impl GeolocationLookup for FixedLookup {
        async fn fetch(&self, _ip: IpAddr, _fields: &[&str]) -> LookupOutcome {
            self.0.clone()
        }
    }

    fn service(outcome: LookupOutcome) -> GeolocationService {
        GeolocationService::new(
            Arc::new(LiteralResolver),
            Arc::new(FixedLookup(outcome)),
            Arc::new(MemoryGeolocationRepository::new()),
        )
    }

    fn full_outcome() -> LookupOutcome {
        LookupOutcome::Fields(vec![
            ("city".to_string(), "Warsaw".to_string()),
            ("zip".to_string(), "00-001".to_string()),
            ("country_name".to_string(), "Poland".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_create_then_list_get_delete() {
        let service = service(full_outcome());

        let record = match service.create("77.46.83.45").await.unwrap() {
            CreateOutcome::Created(record) => record,
            CreateOutcome::Invalid(errors) => panic!("unexpected errors: {:?}", errors),
        };
        assert_eq!(record.ip_address, "77.46.83.45");

        let listed = service.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);

        let fetched = service.get(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.city, "Warsaw");

        assert!(service.delete(record.id).await.unwrap());
        assert!(service.get(record.id).await.unwrap().is_none());
        assert!(!service.delete(record.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_invalid_address_returns_errors() {
        let service = service(full_outcome());

        match service.create("not an address").await.unwrap() {
            CreateOutcome::Invalid(errors) => {
                assert_eq!(
                    errors.messages("address"),
                    Some(&["is invalid".to_string()][..])
                );
            }
            CreateOutcome::Created(record) => panic!("unexpected record: {:?}", record),
        }
    }

    #[tokio::test]
    async fn test_create_same_address_twice_is_rejected() {
        let service = service(full_outcome());

        assert!(matches!(
            service.create("77.46.83.45").await.unwrap(),
            CreateOutcome::Created(_)
        ));
        match service.create("77.46.83.45").await.unwrap() {
            CreateOutcome::Invalid(errors) => {
                assert_eq!(
                    errors.messages("address"),
                    Some(&["has already been taken".to_string()][..])
                );
            }
            CreateOutcome::Created(record) => panic!("unexpected record: {:?}", record),
        }
    }
}
