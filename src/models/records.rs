use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The cacheable resource kinds served by this aggregator.
///
/// Each kind maps to one database table, one provider client and one
/// configured time-to-live. `Location` is deliberately absent: location rows
/// never expire and follow their own lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Weather,
    Meetup,
    Movie,
    Review,
    Trail,
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Meetup => "meetups",
            Self::Movie => "movies",
            Self::Review => "reviews",
            Self::Trail => "trails",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every normalized record so the cache protocol can judge the
/// age of a stored batch. Freshness is evaluated from the first row of a
/// batch; all rows written together carry the same timestamp anyway.
pub trait CachedRecord {
    fn created_at(&self) -> DateTime<Utc>;
}

/// One day of weather forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast: String,
    pub time: String,
    pub created_at: DateTime<Utc>,
}

/// An upcoming meetup event near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meetup {
    pub link: String,
    pub name: String,
    pub creation_date: String,
    pub host: String,
    pub created_at: DateTime<Utc>,
}

/// A movie related to a location's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub overview: String,
    pub average_votes: f64,
    pub image_url: String,
    pub popularity: f64,
    pub released_on: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A business review summary near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    pub rating: f64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// A hiking trail near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub name: String,
    pub location: String,
    pub length: f64,
    pub stars: f64,
    pub star_votes: i32,
    pub summary: String,
    pub trail_url: String,
    pub condition: Option<String>,
    pub condition_date: String,
    pub condition_time: String,
    pub created_at: DateTime<Utc>,
}

impl CachedRecord for Forecast {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CachedRecord for Meetup {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CachedRecord for Movie {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CachedRecord for Review {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CachedRecord for Trail {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
