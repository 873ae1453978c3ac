pub mod cache;
pub mod location;

pub use cache::{CacheError, CacheOutcome, ResourceFetcher, ResourceStore, fetch_resource};
pub use location::{GeocodedLocation, LocationFetcher, resolve_location};
