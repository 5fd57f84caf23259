//! Address Resolver Port
//!
//! Defines the interface for turning a raw address string into an IP.

use async_trait::async_trait;
use std::net::IpAddr;

/// Resolver for a human-supplied address (IP literal or URL).
///
/// This is an outbound port. Implementations classify IP literals without
/// any network traffic and resolve URL hosts with a DNS forward lookup.
/// Resolution failure is a value, never an error raised to the caller.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolve an address to an IP address.
    ///
    /// Returns None for blank input, unparsable input, a URL without a
    /// host, or a host that does not resolve. A single attempt per call.
    async fn resolve(&self, address: &str) -> Option<IpAddr>;
}
