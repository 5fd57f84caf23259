//! geoloc Library
//!
//! This module exposes the geoloc components for use in integration tests
//! and as a library.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use application::{CreateOutcome, EnrichmentPipeline, GeolocationService};
pub use config::load_config;
pub use domain::entities::{Geolocation, NewGeolocation};
pub use domain::ports::{AddressResolver, GeolocationLookup, GeolocationRepository, StoreError};
pub use domain::value_objects::{LookupOutcome, ValidationErrors};
