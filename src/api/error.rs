use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::clients::FetchError;
use crate::db::StoreError;
use crate::services::cache::CacheError;

/// What a failed request looks like to the client. Fetch and store failures
/// are deliberately indistinguishable: both collapse to a 500 with an opaque
/// message, with the detail only in the server log.
#[derive(Debug)]
pub enum ApiError {
    Fetch(FetchError),

    Store(StoreError),

    BadRequest(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Fetch(err) => write!(f, "Fetch error: {}", err),
            ApiError::Store(err) => write!(f, "Store error: {}", err),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Fetch(err) => {
                tracing::error!("Provider fetch failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, something went wrong".to_string(),
                )
            }
            ApiError::Store(err) => {
                tracing::error!("Store operation failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Sorry, something went wrong".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Fetch(e) => ApiError::Fetch(e),
            CacheError::Store(e) => ApiError::Store(e),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        ApiError::Fetch(err)
    }
}
