mod enrichment_pipeline;
mod geolocation_service;

pub use enrichment_pipeline::{EnrichmentPipeline, REQUIRED_FIELDS};
pub use geolocation_service::{CreateOutcome, GeolocationService};
