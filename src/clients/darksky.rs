use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{Forecast, LocationRef};
use crate::services::cache::ResourceFetcher;

use super::FetchError;

const DARKSKY_API: &str = "https://api.darksky.net/forecast";
const PROVIDER: &str = "darksky";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Daily,
}

#[derive(Debug, Deserialize)]
struct Daily {
    data: Vec<Day>,
}

#[derive(Debug, Deserialize)]
pub struct Day {
    pub summary: String,
    pub time: i64,
}

/// Dark Sky daily forecast client.
#[derive(Clone)]
pub struct DarkSkyClient {
    client: Client,
    api_key: String,
}

impl DarkSkyClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    pub async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Forecast>, FetchError> {
        let url = format!(
            "{}/{}/{},{}",
            DARKSKY_API, self.api_key, latitude, longitude
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

        let payload: ForecastResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                provider: PROVIDER,
                source: e,
            })?;

        let now = Utc::now();
        Ok(payload.daily.data.iter().map(|d| map_day(d, now)).collect())
    }
}

fn map_day(day: &Day, now: DateTime<Utc>) -> Forecast {
    let time = DateTime::from_timestamp(day.time, 0)
        .map_or_else(String::new, |t| t.format("%a %b %d %Y").to_string());

    Forecast {
        forecast: day.summary.clone(),
        time,
        created_at: now,
    }
}

#[async_trait]
impl ResourceFetcher<Forecast> for DarkSkyClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<Forecast>, FetchError> {
        self.daily_forecast(location.latitude, location.longitude)
            .await
    }
}
