use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{LocationRef, Review};
use crate::services::cache::ResourceFetcher;

use super::FetchError;

const YELP_API: &str = "https://api.yelp.com/v3/businesses/search";
const PROVIDER: &str = "yelp";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
pub struct Business {
    pub name: String,
    pub image_url: Option<String>,
    pub price: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub url: String,
}

/// Yelp business search client. The only provider here using bearer-token
/// auth instead of a key in the query string.
#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    api_key: String,
}

impl YelpClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    pub async fn search_businesses(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Review>, FetchError> {
        let url = format!("{YELP_API}?latitude={latitude}&longitude={longitude}");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                provider: PROVIDER,
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let payload: SearchResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                provider: PROVIDER,
                source: e,
            })?;

        let now = Utc::now();
        Ok(payload
            .businesses
            .iter()
            .map(|b| map_business(b, now))
            .collect())
    }
}

fn map_business(business: &Business, now: DateTime<Utc>) -> Review {
    Review {
        name: business.name.clone(),
        image_url: business.image_url.clone(),
        price: business.price.clone(),
        rating: business.rating,
        url: business.url.clone(),
        created_at: now,
    }
}

#[async_trait]
impl ResourceFetcher<Review> for YelpClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<Review>, FetchError> {
        self.search_businesses(location.latitude, location.longitude)
            .await
    }
}
