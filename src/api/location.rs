use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::models::Location;
use crate::services::location::resolve_location;
use crate::state::SharedState;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    /// Free-text place query, e.g. `?data=seattle`.
    data: String,
}

pub async fn get_location(
    State(state): State<Arc<SharedState>>,
    Query(request): Query<LocationRequest>,
) -> Result<Json<Location>, ApiError> {
    let query = request.data.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Missing location query".to_string()));
    }

    let location = resolve_location(&state.store, state.geocoder.as_ref(), query).await?;
    Ok(Json(location))
}
