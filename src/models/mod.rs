pub mod location;
pub mod records;

pub use location::{Location, LocationRef};
pub use records::{CachedRecord, Forecast, Meetup, Movie, ResourceKind, Review, Trail};
