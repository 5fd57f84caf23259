//! Adapters Layer
//!
//! Inbound adapters drive the application (HTTP API); outbound adapters
//! implement the domain ports (DNS, provider HTTP client, record stores).

pub mod inbound;
pub mod outbound;
