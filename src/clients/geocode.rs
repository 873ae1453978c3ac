use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::services::location::{GeocodedLocation, LocationFetcher};

use super::FetchError;

const GEOCODE_API: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const PROVIDER: &str = "geocode";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Google forward-geocoding client.
#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    api_key: String,
}

impl GeocodeClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

fn map_result(result: &GeocodeResult) -> GeocodedLocation {
    GeocodedLocation {
        formatted_query: result.formatted_address.clone(),
        latitude: result.geometry.location.lat,
        longitude: result.geometry.location.lng,
    }
}

#[async_trait]
impl LocationFetcher for GeocodeClient {
    async fn geocode(&self, query: &str) -> Result<GeocodedLocation, FetchError> {
        let url = format!(
            "{}?address={}&key={}",
            GEOCODE_API,
            urlencoding::encode(query),
            self.api_key
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

        let payload: GeocodeResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                provider: PROVIDER,
                source: e,
            })?;

        // An unknown place and a provider outage look the same to the client;
        // both surface as a generic failure.
        payload.results.first().map(map_result).ok_or_else(|| {
            FetchError::NoMatch {
                provider: PROVIDER,
                query: query.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_first_geocode_result() {
        let payload: GeocodeResponse = serde_json::from_str(
            r#"{
                "results": [{
                    "formatted_address": "Seattle, WA, USA",
                    "geometry": {"location": {"lat": 47.6062, "lng": -122.3321}}
                }]
            }"#,
        )
        .unwrap();

        let geocoded = map_result(&payload.results[0]);
        assert_eq!(geocoded.formatted_query, "Seattle, WA, USA");
        assert!((geocoded.latitude - 47.6062).abs() < f64::EPSILON);
        assert!((geocoded.longitude - -122.3321).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_results_parse_cleanly() {
        let payload: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(payload.results.is_empty());
    }
}
