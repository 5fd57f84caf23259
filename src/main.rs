//! geoloc - IP Geolocation Record Service with Hexagonal Architecture
//!
//! This is the composition root that wires together all the components.

mod adapters;
mod application;
mod config;
mod domain;

use crate::adapters::inbound::ApiServer;
use crate::adapters::outbound::{DnsAddressResolver, IpstackClient, SqliteGeolocationRepository};
use crate::application::GeolocationService;
use crate::config::load_config;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting geoloc listen={} db={} provider={}",
        cfg.listen_addr,
        cfg.db_path,
        cfg.api_base_url
    );

    if cfg.api_access_key.is_empty() {
        tracing::warn!("GEOLOCATION_API_KEY is not set; provider lookups will fail");
    }

    // ===== COMPOSITION ROOT =====
    // Wire up all adapters and services

    // 1. Create outbound adapters

    // Record store (SQLite)
    let store = Arc::new(SqliteGeolocationRepository::open(&cfg.db_path)?);

    // Address resolver (system DNS)
    let resolver = Arc::new(DnsAddressResolver::new());

    // Geolocation lookup client (ipstack-compatible provider)
    let lookup = Arc::new(IpstackClient::new(
        cfg.api_base_url.clone(),
        cfg.api_access_key.clone(),
    ));

    // 2. Create application service
    let service = Arc::new(GeolocationService::new(resolver, lookup, store));

    // 3. Create inbound adapter and run
    let server = ApiServer::new(cfg.listen_addr.clone(), service);

    server.run().await
}
