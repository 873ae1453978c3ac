use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geocoded place as stored in the database.
///
/// Locations are keyed by the raw `search_query` the client sent and are
/// permanently valid once cached: lookups never expire or delete them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i32,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// The subset of a location the resource endpoints need: the cache key plus
/// the geographic parameters handed to provider fetches. This is what the
/// frontend echoes back in the `data` query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: i32,
    pub search_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Location> for LocationRef {
    fn from(location: &Location) -> Self {
        Self {
            id: location.id,
            search_query: location.search_query.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}
