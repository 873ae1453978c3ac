use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::models::{LocationRef, Movie};
use crate::services::cache::ResourceFetcher;

use super::FetchError;

const TMDB_API: &str = "https://api.themoviedb.org/3/search/movie";
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";
const POSTER_PLACEHOLDER: &str = "http://i.imgur.com/J5LVHEL.jpg";
const PROVIDER: &str = "tmdb";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieResult>,
}

#[derive(Debug, Deserialize)]
pub struct MovieResult {
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    pub release_date: Option<String>,
}

/// The Movie Database search client. Movies are searched by the location's
/// raw query text, not its coordinates.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
}

impl TmdbClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    pub async fn search_movies(&self, query: &str) -> Result<Vec<Movie>, FetchError> {
        let url = format!(
            "{}?api_key={}&language=en-US&page=1&query={}",
            TMDB_API,
            self.api_key,
            urlencoding::encode(query)
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

        let payload: SearchResponse =
            response.json().await.map_err(|e| FetchError::Decode {
                provider: PROVIDER,
                source: e,
            })?;

        let now = Utc::now();
        Ok(payload.results.iter().map(|m| map_movie(m, now)).collect())
    }
}

fn map_movie(movie: &MovieResult, now: DateTime<Utc>) -> Movie {
    let image_url = movie.poster_path.as_ref().map_or_else(
        || POSTER_PLACEHOLDER.to_string(),
        |path| format!("{POSTER_BASE}{path}"),
    );

    Movie {
        title: movie.title.clone(),
        overview: movie.overview.clone(),
        average_votes: movie.vote_average,
        image_url,
        popularity: movie.popularity,
        released_on: movie.release_date.clone(),
        created_at: now,
    }
}

#[async_trait]
impl ResourceFetcher<Movie> for TmdbClient {
    async fn fetch(&self, location: &LocationRef) -> Result<Vec<Movie>, FetchError> {
        self.search_movies(&location.search_query).await
    }
}
