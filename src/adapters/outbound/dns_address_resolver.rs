//! DNS Address Resolver
//!
//! Implements AddressResolver by classifying the input as an IP literal
//! or a URL and resolving URL hosts through the system DNS resolver.

use crate::domain::ports::AddressResolver;
use async_trait::async_trait;
use std::net::IpAddr;
use url::Url;

/// Address resolver backed by the system resolver.
///
/// IP literals are returned as-is with zero network calls. URL input is
/// parsed with the `url` crate and its host resolved with a single
/// forward lookup; the first returned address wins. Anything else fails
/// resolution.
pub struct DnsAddressResolver;

impl DnsAddressResolver {
    pub fn new() -> Self {
        Self
    }

    async fn resolve_host(host: &str) -> Option<IpAddr> {
        // lookup_host wants a socket address; the port is irrelevant here
        match tokio::net::lookup_host((host, 0u16)).await {
            Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
            Err(e) => {
                tracing::debug!("dns lookup failed for {}: {}", host, e);
                None
            }
        }
    }
}

impl Default for DnsAddressResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressResolver for DnsAddressResolver {
    async fn resolve(&self, address: &str) -> Option<IpAddr> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        if let Ok(ip) = address.parse::<IpAddr>() {
            return Some(ip);
        }

        let parsed = Url::parse(address).ok()?;
        match parsed.host()? {
            url::Host::Ipv4(ip) => Some(IpAddr::V4(ip)),
            url::Host::Ipv6(ip) => Some(IpAddr::V6(ip)),
            url::Host::Domain(host) => Self::resolve_host(host).await,
        }
    }
}
