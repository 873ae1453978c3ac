//! One thin handler per cached resource kind. Each picks its TTL, fetcher
//! and store table, then defers to the shared cache protocol.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Forecast, LocationRef, Meetup, Movie, ResourceKind, Review, Trail};
use crate::services::cache::fetch_resource;
use crate::state::SharedState;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct ResourceRequest {
    /// The location object previously returned by `/location`, JSON-encoded,
    /// e.g. `?data={"id":1,"search_query":"seattle","latitude":47.6,"longitude":-122.3}`.
    data: String,
}

fn parse_location(request: &ResourceRequest) -> Result<LocationRef, ApiError> {
    serde_json::from_str(&request.data)
        .map_err(|e| ApiError::BadRequest(format!("Invalid location data: {e}")))
}

pub async fn get_weather(
    State(state): State<Arc<SharedState>>,
    Query(request): Query<ResourceRequest>,
) -> Result<Json<Vec<Forecast>>, ApiError> {
    let location = parse_location(&request)?;
    let ttl = state.config.cache.ttl(ResourceKind::Weather);

    let rows = fetch_resource(
        &state.store,
        state.weather.as_ref(),
        ResourceKind::Weather,
        ttl,
        &location,
    )
    .await?;

    Ok(Json(rows))
}

pub async fn get_meetups(
    State(state): State<Arc<SharedState>>,
    Query(request): Query<ResourceRequest>,
) -> Result<Json<Vec<Meetup>>, ApiError> {
    let location = parse_location(&request)?;
    let ttl = state.config.cache.ttl(ResourceKind::Meetup);

    let rows = fetch_resource(
        &state.store,
        state.meetups.as_ref(),
        ResourceKind::Meetup,
        ttl,
        &location,
    )
    .await?;

    Ok(Json(rows))
}

pub async fn get_movies(
    State(state): State<Arc<SharedState>>,
    Query(request): Query<ResourceRequest>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let location = parse_location(&request)?;
    let ttl = state.config.cache.ttl(ResourceKind::Movie);

    let rows = fetch_resource(
        &state.store,
        state.movies.as_ref(),
        ResourceKind::Movie,
        ttl,
        &location,
    )
    .await?;

    Ok(Json(rows))
}

pub async fn get_yelp(
    State(state): State<Arc<SharedState>>,
    Query(request): Query<ResourceRequest>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let location = parse_location(&request)?;
    let ttl = state.config.cache.ttl(ResourceKind::Review);

    let rows = fetch_resource(
        &state.store,
        state.reviews.as_ref(),
        ResourceKind::Review,
        ttl,
        &location,
    )
    .await?;

    Ok(Json(rows))
}

pub async fn get_trails(
    State(state): State<Arc<SharedState>>,
    Query(request): Query<ResourceRequest>,
) -> Result<Json<Vec<Trail>>, ApiError> {
    let location = parse_location(&request)?;
    let ttl = state.config.cache.ttl(ResourceKind::Trail);

    let rows = fetch_resource(
        &state.store,
        state.trails.as_ref(),
        ResourceKind::Trail,
        ttl,
        &location,
    )
    .await?;

    Ok(Json(rows))
}
