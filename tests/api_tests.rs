//! Route-level tests: real router and in-memory sqlite store, stub provider
//! fetchers.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use cityscout::clients::FetchError;
use cityscout::config::Config;
use cityscout::db::Store;
use cityscout::models::{Forecast, LocationRef, Meetup, Movie, Review, Trail};
use cityscout::services::cache::{ResourceFetcher, ResourceStore};
use cityscout::services::location::{GeocodedLocation, LocationFetcher};
use cityscout::state::SharedState;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

struct StubGeocoder {
    calls: AtomicUsize,
}

impl StubGeocoder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LocationFetcher for StubGeocoder {
    async fn geocode(&self, _query: &str) -> Result<GeocodedLocation, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeocodedLocation {
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.6062,
            longitude: -122.3321,
        })
    }
}

struct StubFetcher<R> {
    items: Vec<R>,
    calls: AtomicUsize,
}

impl<R> StubFetcher<R> {
    fn returning(items: Vec<R>) -> Arc<Self> {
        Arc::new(Self {
            items,
            calls: AtomicUsize::new(0),
        })
    }

    fn empty() -> Arc<Self> {
        Self::returning(Vec::new())
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> ResourceFetcher<R> for StubFetcher<R> {
    async fn fetch(&self, _location: &LocationRef) -> Result<Vec<R>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.clone())
    }
}

struct FailingFetcher;

#[async_trait]
impl<R: Send> ResourceFetcher<R> for FailingFetcher {
    async fn fetch(&self, _location: &LocationRef) -> Result<Vec<R>, FetchError> {
        Err(FetchError::Status {
            provider: "stub",
            status: 503,
        })
    }
}

struct TestFetchers {
    geocoder: Arc<StubGeocoder>,
    weather: Arc<dyn ResourceFetcher<Forecast>>,
    meetups: Arc<dyn ResourceFetcher<Meetup>>,
    movies: Arc<dyn ResourceFetcher<Movie>>,
    reviews: Arc<dyn ResourceFetcher<Review>>,
    trails: Arc<dyn ResourceFetcher<Trail>>,
}

impl Default for TestFetchers {
    fn default() -> Self {
        Self {
            geocoder: StubGeocoder::new(),
            weather: StubFetcher::<Forecast>::empty(),
            meetups: StubFetcher::<Meetup>::empty(),
            movies: StubFetcher::<Movie>::empty(),
            reviews: StubFetcher::<Review>::empty(),
            trails: StubFetcher::<Trail>::empty(),
        }
    }
}

async fn memory_store() -> Store {
    // A single pooled connection keeps every statement on the same in-memory
    // database.
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("failed to open in-memory store")
}

fn build_router(store: Store, fetchers: TestFetchers) -> Router {
    let state = SharedState::with_fetchers(
        Config::default(),
        store,
        fetchers.geocoder,
        fetchers.weather,
        fetchers.meetups,
        fetchers.movies,
        fetchers.reviews,
        fetchers.trails,
    );
    cityscout::api::router(Arc::new(state))
}

async fn seed_location(store: &Store) -> LocationRef {
    let location = store
        .insert_location("seattle", "Seattle, WA, USA", 47.6062, -122.3321)
        .await
        .expect("failed to seed location");
    LocationRef::from(&location)
}

fn resource_uri(path: &str, location: &LocationRef) -> String {
    let data = serde_json::to_string(location).expect("location serializes");
    format!("{}?data={}", path, urlencoding::encode(&data))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn forecast(summary: &str) -> Forecast {
    Forecast {
        forecast: summary.to_string(),
        time: "Mon Jan 01 2024".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn location_is_geocoded_once_then_served_from_cache() {
    let store = memory_store().await;
    let fetchers = TestFetchers::default();
    let geocoder = fetchers.geocoder.clone();
    let app = build_router(store, fetchers);

    let (status, body) = get_json(&app, "/location?data=seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formatted_query"], "Seattle, WA, USA");
    assert_eq!(body["search_query"], "seattle");

    let (status, body) = get_json(&app, "/location?data=seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["formatted_query"], "Seattle, WA, USA");

    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn location_with_empty_query_is_rejected() {
    let store = memory_store().await;
    let app = build_router(store, TestFetchers::default());

    let (status, _) = get_json(&app, "/location?data=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weather_miss_fetches_and_persists_one_row_per_item() {
    let store = memory_store().await;
    let location = seed_location(&store).await;

    let weather = StubFetcher::returning(vec![forecast("Sunny"), forecast("Rain")]);
    let fetchers = TestFetchers {
        weather: weather.clone(),
        ..Default::default()
    };
    let app = build_router(store.clone(), fetchers);

    let (status, body) = get_json(&app, &resource_uri("/weather", &location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["forecast"], "Sunny");

    let stored: Vec<Forecast> = store.find_by_location(location.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn weather_hit_serves_stored_rows_without_fetching() {
    let store = memory_store().await;
    let location = seed_location(&store).await;
    store
        .insert_all(location.id, &[forecast("Stored forecast")])
        .await
        .unwrap();

    let weather = StubFetcher::returning(vec![forecast("Fresh fetch")]);
    let fetchers = TestFetchers {
        weather: weather.clone(),
        ..Default::default()
    };
    let app = build_router(store, fetchers);

    let (status, body) = get_json(&app, &resource_uri("/weather", &location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["forecast"], "Stored forecast");
    assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_provider_items_is_an_empty_success() {
    let store = memory_store().await;
    let location = seed_location(&store).await;
    let app = build_router(store.clone(), TestFetchers::default());

    let (status, body) = get_json(&app, &resource_uri("/weather", &location)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let stored: Vec<Forecast> = store.find_by_location(location.id).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn fetch_failure_returns_500_and_writes_nothing() {
    let store = memory_store().await;
    let location = seed_location(&store).await;

    let fetchers = TestFetchers {
        weather: Arc::new(FailingFetcher),
        ..Default::default()
    };
    let app = build_router(store.clone(), fetchers);

    let (status, body) = get_json(&app, &resource_uri("/weather", &location)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Sorry, something went wrong");

    let stored: Vec<Forecast> = store.find_by_location(location.id).await.unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn malformed_location_data_is_rejected() {
    let store = memory_store().await;
    let app = build_router(store, TestFetchers::default());

    let (status, _) = get_json(&app, "/weather?data=notjson").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn every_resource_route_is_wired() {
    let store = memory_store().await;
    let location = seed_location(&store).await;

    let now = Utc::now();
    let fetchers = TestFetchers {
        meetups: StubFetcher::returning(vec![Meetup {
            link: "https://meetup.example/1".to_string(),
            name: "Rust Meetup".to_string(),
            creation_date: "Mon Jan 01 2024".to_string(),
            host: "Rustaceans".to_string(),
            created_at: now,
        }]),
        movies: StubFetcher::returning(vec![Movie {
            title: "Sleepless in Seattle".to_string(),
            overview: String::new(),
            average_votes: 6.7,
            image_url: "http://i.imgur.com/J5LVHEL.jpg".to_string(),
            popularity: 21.5,
            released_on: Some("1993-06-24".to_string()),
            created_at: now,
        }]),
        reviews: StubFetcher::returning(vec![Review {
            name: "Pike Place Chowder".to_string(),
            image_url: None,
            price: Some("$$".to_string()),
            rating: 4.5,
            url: "https://yelp.example/1".to_string(),
            created_at: now,
        }]),
        trails: StubFetcher::returning(vec![Trail {
            name: "Rattlesnake Ledge".to_string(),
            location: "North Bend, Washington".to_string(),
            length: 4.3,
            stars: 4.4,
            star_votes: 1201,
            summary: String::new(),
            trail_url: "https://hiking.example/1".to_string(),
            condition: Some("All Clear".to_string()),
            condition_date: "2024-05-01".to_string(),
            condition_time: "14:30:00".to_string(),
            created_at: now,
        }]),
        ..Default::default()
    };
    let app = build_router(store, fetchers);

    for (path, field, expected) in [
        ("/meetups", "name", "Rust Meetup"),
        ("/movies", "title", "Sleepless in Seattle"),
        ("/yelp", "name", "Pike Place Chowder"),
        ("/trails", "name", "Rattlesnake Ledge"),
    ] {
        let (status, body) = get_json(&app, &resource_uri(path, &location)).await;
        assert_eq!(status, StatusCode::OK, "{path} should succeed");
        assert_eq!(body[0][field], expected, "{path} payload mismatch");
    }
}
