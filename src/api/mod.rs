use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

mod error;
mod location;
mod resources;

pub use error::ApiError;

/// The HTTP surface: one route per resource kind, matching what the
/// city-explorer frontend expects.
pub fn router(state: Arc<SharedState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/location", get(location::get_location))
        .route("/weather", get(resources::get_weather))
        .route("/meetups", get(resources::get_meetups))
        .route("/movies", get(resources::get_movies))
        .route("/yelp", get(resources::get_yelp))
        .route("/trails", get(resources::get_trails))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
