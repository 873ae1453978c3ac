use std::sync::Arc;

use crate::clients::{
    DarkSkyClient, GeocodeClient, HikingProjectClient, MeetupClient, TmdbClient, YelpClient,
};
use crate::config::Config;
use crate::db::Store;
use crate::models::{Forecast, Meetup, Movie, Review, Trail};
use crate::services::cache::ResourceFetcher;
use crate::services::location::LocationFetcher;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// This client should be reused across all provider clients to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("CityScout/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Everything a request handler needs: the store plus one fetcher per
/// resource kind. Fetchers are trait objects so tests can swap the real
/// provider clients for doubles.
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub geocoder: Arc<dyn LocationFetcher>,

    pub weather: Arc<dyn ResourceFetcher<Forecast>>,

    pub meetups: Arc<dyn ResourceFetcher<Meetup>>,

    pub movies: Arc<dyn ResourceFetcher<Movie>>,

    pub reviews: Arc<dyn ResourceFetcher<Review>>,

    pub trails: Arc<dyn ResourceFetcher<Trail>>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.providers.request_timeout_seconds.into())?;

        let providers = &config.providers;
        let geocoder = Arc::new(GeocodeClient::new(
            http_client.clone(),
            providers.geocode_key(),
        ));
        let weather = Arc::new(DarkSkyClient::new(
            http_client.clone(),
            providers.weather_key(),
        ));
        let meetups = Arc::new(MeetupClient::new(
            http_client.clone(),
            providers.meetup_key(),
        ));
        let movies = Arc::new(TmdbClient::new(http_client.clone(), providers.movie_key()));
        let reviews = Arc::new(YelpClient::new(http_client.clone(), providers.yelp_key()));
        let trails = Arc::new(HikingProjectClient::new(http_client, providers.trail_key()));

        Ok(Self {
            config: Arc::new(config),
            store,
            geocoder,
            weather,
            meetups,
            movies,
            reviews,
            trails,
        })
    }

    /// Assemble a state from pre-built parts. This is the seam integration
    /// tests use to inject stub fetchers against a real (in-memory) store.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn with_fetchers(
        config: Config,
        store: Store,
        geocoder: Arc<dyn LocationFetcher>,
        weather: Arc<dyn ResourceFetcher<Forecast>>,
        meetups: Arc<dyn ResourceFetcher<Meetup>>,
        movies: Arc<dyn ResourceFetcher<Movie>>,
        reviews: Arc<dyn ResourceFetcher<Review>>,
        trails: Arc<dyn ResourceFetcher<Trail>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            geocoder,
            weather,
            meetups,
            movies,
            reviews,
            trails,
        }
    }
}
