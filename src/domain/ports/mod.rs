mod address_resolver;
mod geolocation_lookup;
mod geolocation_repository;

pub use address_resolver::AddressResolver;
pub use geolocation_lookup::GeolocationLookup;
pub use geolocation_repository::{GeolocationRepository, StoreError};
