use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{LocationRef, Trail};
use crate::services::cache::ResourceFetcher;

use super::FetchError;

const HIKING_API: &str = "https://www.hikingproject.com/data/get-trails";
const PROVIDER: &str = "hiking_project";
const MAX_DISTANCE_MILES: u32 = 10;

#[derive(Debug, Deserialize)]
struct TrailsResponse {
    trails: Vec<TrailResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailResult {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub star_votes: i32,
    #[serde(default)]
    pub summary: String,
    pub url: String,
    pub condition_status: Option<String>,
    /// "YYYY-MM-DD HH:MM:SS", sometimes empty.
    #[serde(default)]
    pub condition_date: String,
}

/// Hiking Project trail search client.
#[derive(Clone)]
pub struct HikingProjectClient {
    client: Client,
    api_key: String,
}

impl HikingProjectClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    pub async fn nearby_trails(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Trail>, FetchError> {
        let url = format!(
            "{}?lat={}&lon={}&maxDistance={}&key={}",
            HIKING_API, latitude, longitude, MAX_DISTANCE_MILES, self.api_key
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            FetchError::Transport {
                provider: PROVIDER,
                source: e,
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let payload: TrailsResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                provider: PROVIDER,
                source: e,
            })?;

        let now = Utc::now();
        Ok(payload.trails.iter().map(|t| map_trail(t, now)).collect())
    }
}

fn split_condition_date(raw: &str) -> (String, String) {
    match raw.split_once(' ') {
        Some((date, time)) => (date.to_string(), time.to_string()),
        None => (raw.to_string(), String::new()),
    }
}

fn map_trail(trail: &TrailResult, now: DateTime<Utc>) -> Trail {
    let (condition_date, condition_time) = split_condition_date(&trail.condition_date);

    Trail {
        name: trail.name.clone(),
        location: trail.location.clone(),
        length: trail.length,
        stars: trail.stars,
        star_votes: trail.star_votes,
        summary: trail.summary.clone(),
        trail_url: trail.url.clone(),
        condition: trail.condition_status.clone(),
        condition_date,
        condition_time,
        created_at: now,
    }
}

#[async_trait]
impl ResourceFetcher<Trail> for HikingProjectClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<Trail>, FetchError> {
        self.nearby_trails(location.latitude, location.longitude)
            .await
    }
}
