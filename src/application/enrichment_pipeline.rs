//! Enrichment Pipeline - record creation use case
//!
//! Sequences address resolution, the duplicate pre-check, the provider
//! lookup, and the ordered validation rules that decide whether a
//! geolocation record may be created.

use crate::domain::entities::{Geolocation, NewGeolocation};
use crate::domain::ports::{AddressResolver, GeolocationLookup, GeolocationRepository, StoreError};
use crate::domain::value_objects::{LookupOutcome, ValidationErrors, BASE};
use std::net::IpAddr;

/// Provider fields required on every record, in lookup order.
pub const REQUIRED_FIELDS: [&str; 3] = ["city", "zip", "country_name"];

const ADDRESS: &str = "address";

/// Validation steps, in execution order.
///
/// Each step is a function from cached pipeline state to an updated error
/// set. A step guards on the errors recorded by earlier steps, so a failed
/// group suppresses its dependents while independent groups still run.
const VALIDATION_STEPS: &[fn(&EnrichmentPipeline, &mut ValidationErrors)] = &[
    validate_address_presence,
    validate_address_resolvable,
    validate_ip_unique,
    validate_provider_answered,
    validate_required_fields_present,
];

/// One record-creation attempt for one raw address.
///
/// Resolution, the duplicate pre-check, and the provider lookup run once,
/// at [`EnrichmentPipeline::prepare`] time, and are cached; validation and
/// save reuse the cached values, so repeated calls never repeat a network
/// call.
pub struct EnrichmentPipeline {
    address: String,
    resolved_ip: Option<IpAddr>,
    already_taken: bool,
    lookup: Option<LookupOutcome>,
    errors: ValidationErrors,
}

impl EnrichmentPipeline {
    /// Prepare a pipeline for one raw address.
    ///
    /// At most one DNS query (URL input) and one provider call happen here.
    /// The provider is not called when resolution fails or when the IP is
    /// already taken. Only an unexpected store fault is an error; every
    /// resolution or lookup failure becomes validation state.
    pub async fn prepare(
        address: &str,
        resolver: &dyn AddressResolver,
        lookup: &dyn GeolocationLookup,
        store: &dyn GeolocationRepository,
    ) -> Result<Self, StoreError> {
        let resolved_ip = if address.trim().is_empty() {
            None
        } else {
            resolver.resolve(address).await
        };

        let mut already_taken = false;
        let mut outcome = None;
        if let Some(ip) = resolved_ip {
            already_taken = store.exists(&ip.to_string()).await?;
            if !already_taken {
                outcome = Some(lookup.fetch(ip, &REQUIRED_FIELDS).await);
            }
        }

        Ok(Self {
            address: address.to_string(),
            resolved_ip,
            already_taken,
            lookup: outcome,
            errors: ValidationErrors::new(),
        })
    }

    /// Run the full validation sequence over the cached state.
    ///
    /// Returns true when no step recorded an error. Deterministic for a
    /// given pipeline: repeated calls rebuild the same error set without
    /// touching the network or the store.
    pub fn validate(&mut self) -> bool {
        let mut errors = ValidationErrors::new();
        for step in VALIDATION_STEPS {
            step(self, &mut errors);
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Validate, then persist the record.
    ///
    /// `Ok(None)` means the record was not created and [`Self::errors`]
    /// explains why: either validation failed, or the insert lost the
    /// uniqueness race to a concurrent request. Any other store fault is
    /// returned as an error for the boundary to surface as a server fault.
    pub async fn save(
        &mut self,
        store: &dyn GeolocationRepository,
    ) -> Result<Option<Geolocation>, StoreError> {
        if !self.validate() {
            return Ok(None);
        }

        match store.insert(self.creation_record()).await {
            Ok(record) => Ok(Some(record)),
            Err(StoreError::UniqueViolation) => {
                tracing::warn!(
                    "lost uniqueness race inserting geolocation for {}",
                    self.address
                );
                self.errors.add(BASE, "could not be saved");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    /// Errors recorded by the most recent validation run.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn resolved_ip(&self) -> Option<IpAddr> {
        self.resolved_ip
    }

    fn creation_record(&self) -> NewGeolocation {
        let field = |name: &str| {
            self.lookup
                .as_ref()
                .and_then(|outcome| outcome.field(name))
                .unwrap_or_default()
                .to_string()
        };

        NewGeolocation {
            ip_address: self
                .resolved_ip
                .map(|ip| ip.to_string())
                .unwrap_or_default(),
            city: field("city"),
            country_name: field("country_name"),
            zip: field("zip"),
        }
    }
}

// ===== Validation steps =====

fn validate_address_presence(pipeline: &EnrichmentPipeline, errors: &mut ValidationErrors) {
    if pipeline.address.trim().is_empty() {
        errors.add(ADDRESS, "can't be blank");
    }
}

fn validate_address_resolvable(pipeline: &EnrichmentPipeline, errors: &mut ValidationErrors) {
    if errors.contains_key(ADDRESS) {
        return;
    }
    if pipeline.resolved_ip.is_none() {
        errors.add(ADDRESS, "is invalid");
    }
}

fn validate_ip_unique(pipeline: &EnrichmentPipeline, errors: &mut ValidationErrors) {
    if errors.contains_key(ADDRESS) {
        return;
    }
    if pipeline.already_taken {
        errors.add(ADDRESS, "has already been taken");
    }
}

fn validate_provider_answered(pipeline: &EnrichmentPipeline, errors: &mut ValidationErrors) {
    if errors.contains_key(ADDRESS) {
        return;
    }
    match &pipeline.lookup {
        None | Some(LookupOutcome::NoData) => {
            errors.add(BASE, "Internal problem with external Geolocation API");
        }
        Some(LookupOutcome::Error(message)) => {
            errors.add(BASE, format!("Geolocation api returns error: {}", message));
        }
        Some(LookupOutcome::Fields(_)) => {}
    }
}

fn validate_required_fields_present(pipeline: &EnrichmentPipeline, errors: &mut ValidationErrors) {
    if errors.contains_key(ADDRESS) || errors.contains_key(BASE) {
        return;
    }
    for field in REQUIRED_FIELDS {
        let present = pipeline
            .lookup
            .as_ref()
            .and_then(|outcome| outcome.field(field))
            .is_some();
        if !present {
            errors.add(field, "Geolocation Api did not return value of this field");
        }
    }
}
