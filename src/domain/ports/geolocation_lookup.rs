//! Geolocation Lookup Port
//!
//! Defines the interface for the external geolocation provider call.

use crate::domain::value_objects::LookupOutcome;
use async_trait::async_trait;
use std::net::IpAddr;

/// Client for the external geolocation provider.
///
/// This is an outbound port that abstracts the provider HTTP API.
/// Implementations must normalize every transport, parse, and application
/// failure into a [`LookupOutcome`]; fetch never fails with an error.
#[async_trait]
pub trait GeolocationLookup: Send + Sync {
    /// Fetch enrichment data for an IP, extracting only `fields`.
    async fn fetch(&self, ip: IpAddr, fields: &[&str]) -> LookupOutcome;
}
