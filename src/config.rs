use crate::core::Thresholds;
use crate::models::ScoringConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub database: Option<DatabaseSettings>,
    pub cache: Option<CacheSettings>,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Document store (campaigns and creators)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
    #[serde(default = "default_campaigns_collection")]
    pub campaigns_collection: String,
    #[serde(default = "default_creators_collection")]
    pub creators_collection: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_campaigns_collection() -> String { "campaigns".to_string() }
fn default_creators_collection() -> String { "users".to_string() }
fn default_page_size() -> u32 { 500 }
fn default_timeout_secs() -> u64 { 30 }

/// Match store (PostgreSQL)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub redis_url: String,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_brand_min_score")]
    pub brand_min_score: u8,
    #[serde(default = "default_creator_min_score")]
    pub creator_min_score: u8,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            brand_min_score: default_brand_min_score(),
            creator_min_score: default_creator_min_score(),
            max_limit: default_max_limit(),
        }
    }
}

impl MatchingSettings {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            brand_min_score: self.brand_min_score.min(100),
            creator_min_score: self.creator_min_score.min(100),
        }
    }
}

fn default_brand_min_score() -> u8 { 40 }
fn default_creator_min_score() -> u8 { 50 }
fn default_max_limit() -> u16 { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with COLLAB__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., COLLAB__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        with_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("COLLAB")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply well-known unprefixed variables on top of the layered config
///
/// `DATABASE_URL` and `REDIS_URL` are what hosting platforms inject.
fn with_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.brand_min_score, 40);
        assert_eq!(matching.creator_min_score, 50);
        assert_eq!(matching.thresholds(), Thresholds::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file_with_scoring_overrides() {
        let path = std::env::temp_dir().join(format!("collab_match_cfg_{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 8080

[store]
endpoint = "https://store.test/v1"
api_key = "key"
project_id = "project"
database_id = "db"

[matching]
brand_min_score = 45

[scoring]
location_weight = 20
engagement_rate_threshold = 2.5

[scoring.monetary_followers]
min = 5000
max = 500000
"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.matching.brand_min_score, 45);
        assert_eq!(settings.matching.creator_min_score, 50);
        assert_eq!(settings.scoring.location_weight, 20);
        assert_eq!(settings.scoring.vibe_weight_cap, 30);
        assert_eq!(settings.scoring.engagement_rate_threshold, 2.5);
        assert_eq!(settings.scoring.monetary_followers.min, 5_000);
        assert_eq!(settings.store.campaigns_collection, "campaigns");
        assert!(settings.database.is_none());
    }
}
