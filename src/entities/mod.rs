pub mod prelude;

pub mod locations;
pub mod meetups;
pub mod movies;
pub mod reviews;
pub mod trails;
pub mod weather_forecasts;
