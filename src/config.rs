//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - aniboard.toml (default configuration)
//! - aniboard.local.toml (git-ignored local overrides)
//! - Environment variables (ANIBOARD_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # aniboard.toml
//! [data]
//! anime_path = "data/anime-filtered.csv"
//! rating_path = "data/final_animedataset.csv"
//! user_path = "data/users-score-2023.csv"
//!
//! [query]
//! histogram_bins = 10
//! top_n = 5
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! ANIBOARD_DATA__ANIME_PATH=/custom/anime.csv
//! ANIBOARD_RECOMMEND__DEFAULT_COUNT=3
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the three source datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Anime metadata CSV (anime_id, name, genre, source, ...)
    pub anime_path: PathBuf,

    /// Ratings CSV (user_id, anime_id, score)
    pub rating_path: PathBuf,

    /// User demographics CSV (user_id, gender, ...)
    pub user_path: PathBuf,
}

/// Query layer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Number of equal-width buckets in the score distribution
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Titles returned per demographic group in the top-rated query
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Recommendation stub tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Recommendations returned when the caller gives no count
    #[serde(default = "default_recommend_count")]
    pub default_count: usize,

    /// Upper bound on the count selector exposed to the viewer
    #[serde(default = "default_max_count")]
    pub max_count: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_histogram_bins() -> usize {
    10
}
fn default_top_n() -> usize {
    5
}
fn default_recommend_count() -> usize {
    5
}
fn default_max_count() -> usize {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. aniboard.toml (base configuration)
    /// 2. aniboard.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (ANIBOARD_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        let config: Config = Figment::new()
            .merge(Toml::file("aniboard.toml"))
            .merge(Toml::file("aniboard.local.toml"))
            .merge(Env::prefixed("ANIBOARD_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        let config: Config = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ANIBOARD_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde defaults cannot express
    pub fn validate(&self) -> Result<(), figment::Error> {
        if self.query.histogram_bins == 0 {
            return Err(figment::Error::from(
                "query.histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.recommend.default_count == 0 {
            return Err(figment::Error::from(
                "recommend.default_count must be at least 1".to_string(),
            ));
        }
        if self.recommend.default_count > self.recommend.max_count {
            return Err(figment::Error::from(format!(
                "recommend.default_count ({}) exceeds recommend.max_count ({})",
                self.recommend.default_count, self.recommend.max_count
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                anime_path: PathBuf::from("data/anime.csv"),
                rating_path: PathBuf::from("data/rating.csv"),
                user_path: PathBuf::from("data/user.csv"),
            },
            query: QueryConfig::default(),
            recommend: RecommendConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            histogram_bins: default_histogram_bins(),
            top_n: default_top_n(),
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        RecommendConfig {
            default_count: default_recommend_count(),
            max_count: default_max_count(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
