//! Location resolution: the one resource kind keyed by raw search text
//! instead of a location id, and the only one with no TTL. Once geocoded, a
//! location row is permanently valid and is never deleted by a lookup.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::clients::FetchError;
use crate::db::Store;
use crate::models::Location;

use super::cache::CacheError;

/// A geocoder response before it gains a database identity.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Forward geocoding of free-text place queries.
#[async_trait]
pub trait LocationFetcher: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<GeocodedLocation, FetchError>;
}

/// Serve a location from cache, geocoding and persisting it on first sight.
pub async fn resolve_location(
    store: &Store,
    geocoder: &dyn LocationFetcher,
    query: &str,
) -> Result<Location, CacheError> {
    if let Some(location) = store.find_location(query).await? {
        debug!("Location cache hit for '{}'", query);
        return Ok(location);
    }

    info!("Location cache miss for '{}', geocoding", query);
    let geocoded = geocoder.geocode(query).await?;

    let location = store
        .insert_location(
            query,
            &geocoded.formatted_query,
            geocoded.latitude,
            geocoded.longitude,
        )
        .await?;

    Ok(location)
}
