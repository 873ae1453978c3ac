use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::ResourceKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/cityscout.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Provider credentials. Values left empty fall back to the conventional
/// environment variables, so a `.env` file keeps working.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub geocode_api_key: String,

    pub weather_api_key: String,

    pub meetup_api_key: String,

    pub movie_api_key: String,

    pub yelp_api_key: String,

    pub trail_api_key: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            geocode_api_key: String::new(),
            weather_api_key: String::new(),
            meetup_api_key: String::new(),
            movie_api_key: String::new(),
            yelp_api_key: String::new(),
            trail_api_key: String::new(),
            request_timeout_seconds: 30,
        }
    }
}

fn key_or_env(configured: &str, var: &str) -> String {
    if configured.is_empty() {
        std::env::var(var).unwrap_or_default()
    } else {
        configured.to_string()
    }
}

impl ProvidersConfig {
    #[must_use]
    pub fn geocode_key(&self) -> String {
        key_or_env(&self.geocode_api_key, "GEOCODE_API_KEY")
    }

    #[must_use]
    pub fn weather_key(&self) -> String {
        key_or_env(&self.weather_api_key, "WEATHER_API_KEY")
    }

    #[must_use]
    pub fn meetup_key(&self) -> String {
        key_or_env(&self.meetup_api_key, "MEETUP_API_KEY")
    }

    #[must_use]
    pub fn movie_key(&self) -> String {
        key_or_env(&self.movie_api_key, "MOVIE_API_KEY")
    }

    #[must_use]
    pub fn yelp_key(&self) -> String {
        key_or_env(&self.yelp_api_key, "YELP_API_KEY")
    }

    #[must_use]
    pub fn trail_key(&self) -> String {
        key_or_env(&self.trail_api_key, "TRAIL_API_KEY")
    }
}

/// Per-kind time-to-live for cached resource batches, in seconds. Fixed at
/// process start; never adjusted per request. Location rows have no TTL at
/// all and so no entry here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub weather_ttl_seconds: i64,

    pub meetups_ttl_seconds: i64,

    pub movies_ttl_seconds: i64,

    pub reviews_ttl_seconds: i64,

    pub trails_ttl_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            weather_ttl_seconds: 15,
            meetups_ttl_seconds: 6 * 60 * 60,
            movies_ttl_seconds: 30 * 60 * 60,
            reviews_ttl_seconds: 24 * 60 * 60,
            trails_ttl_seconds: 7 * 24 * 60 * 60,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self, kind: ResourceKind) -> Duration {
        let seconds = match kind {
            ResourceKind::Weather => self.weather_ttl_seconds,
            ResourceKind::Meetup => self.meetups_ttl_seconds,
            ResourceKind::Movie => self.movies_ttl_seconds,
            ResourceKind::Review => self.reviews_ttl_seconds,
            ResourceKind::Trail => self.trails_ttl_seconds,
        };
        Duration::seconds(seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            providers: ProvidersConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cityscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".cityscout").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.providers.request_timeout_seconds == 0 {
            anyhow::bail!("Provider request timeout must be > 0");
        }

        for (name, ttl) in [
            ("weather", self.cache.weather_ttl_seconds),
            ("meetups", self.cache.meetups_ttl_seconds),
            ("movies", self.cache.movies_ttl_seconds),
            ("reviews", self.cache.reviews_ttl_seconds),
            ("trails", self.cache.trails_ttl_seconds),
        ] {
            if ttl <= 0 {
                anyhow::bail!("Cache TTL for {} must be > 0 seconds", name);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.cache.weather_ttl_seconds, 15);
        assert_eq!(config.cache.reviews_ttl_seconds, 24 * 60 * 60);
        assert_eq!(config.cache.movies_ttl_seconds, 30 * 60 * 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ttl_lookup() {
        let config = Config::default();
        assert_eq!(
            config.cache.ttl(ResourceKind::Weather),
            Duration::seconds(15)
        );
        assert_eq!(
            config.cache.ttl(ResourceKind::Trail),
            Duration::days(7)
        );
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[cache]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [cache]
            weather_ttl_seconds = 60
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.cache.weather_ttl_seconds, 60);

        assert_eq!(config.cache.meetups_ttl_seconds, 6 * 60 * 60);
    }

    #[test]
    fn test_config_save_and_reload() {
        let mut config = Config::default();
        config.cache.weather_ttl_seconds = 42;

        let path = std::env::temp_dir().join(format!(
            "cityscout-config-test-{}.toml",
            std::process::id()
        ));
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.cache.weather_ttl_seconds, 42);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.cache.weather_ttl_seconds = 0;
        assert!(config.validate().is_err());
    }
}
