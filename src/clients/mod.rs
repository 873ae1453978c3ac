use thiserror::Error;

pub mod darksky;
pub mod geocode;
pub mod hiking_project;
pub mod meetup;
pub mod tmdb;
pub mod yelp;

pub use darksky::DarkSkyClient;
pub use geocode::GeocodeClient;
pub use hiking_project::HikingProjectClient;
pub use meetup::MeetupClient;
pub use tmdb::TmdbClient;
pub use yelp::YelpClient;

/// A provider fetch that did not yield a usable payload. The API layer masks
/// these behind an opaque 500; the detail only reaches the server log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} payload could not be decoded: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} found no match for '{query}'")]
    NoMatch {
        provider: &'static str,
        query: String,
    },
}
