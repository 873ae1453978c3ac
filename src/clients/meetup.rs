use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{LocationRef, Meetup};
use crate::services::cache::ResourceFetcher;

use super::FetchError;

const MEETUP_API: &str = "https://api.meetup.com/find/upcoming_events";
const PROVIDER: &str = "meetup";
const PAGE_SIZE: u32 = 20;

#[derive(Debug, Deserialize)]
struct EventsResponse {
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    pub link: String,
    pub group: Group,
}

#[derive(Debug, Deserialize)]
pub struct Group {
    pub name: String,
    /// Group creation time in unix milliseconds.
    pub created: i64,
    pub who: String,
}

/// Meetup upcoming-events client.
#[derive(Clone)]
pub struct MeetupClient {
    client: Client,
    api_key: String,
}

impl MeetupClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    pub async fn upcoming_events(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Meetup>, FetchError> {
        let url = format!(
            "{}?sign=true&photo-host=public&lon={}&page={}&lat={}&key={}",
            MEETUP_API, longitude, PAGE_SIZE, latitude, self.api_key
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

        let payload: EventsResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                provider: PROVIDER,
                source: e,
            })?;

        let now = Utc::now();
        Ok(payload.events.iter().map(|e| map_event(e, now)).collect())
    }
}

fn map_event(event: &Event, now: DateTime<Utc>) -> Meetup {
    let creation_date = DateTime::from_timestamp_millis(event.group.created)
        .map_or_else(String::new, |t| t.format("%a %b %d %Y").to_string());

    Meetup {
        link: event.link.clone(),
        name: event.group.name.clone(),
        creation_date,
        host: event.group.who.clone(),
        created_at: now,
    }
}

#[async_trait]
impl ResourceFetcher<Meetup> for MeetupClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<Meetup>, FetchError> {
        self.upcoming_events(location.latitude, location.longitude)
            .await
    }
}
