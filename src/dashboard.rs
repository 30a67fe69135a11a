//! Dashboard Facade
//!
//! Explicit load-once entry point for the whole pipeline. [`Dashboard::load`]
//! reads the three datasets, runs the merge, and returns an immutable handle;
//! the hosting UI keeps that handle for the process lifetime and dispatches
//! viewer selections into it. Nothing here caches globally — consumers get
//! the handle injected instead.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analytics::{
    self, GroupTopTitles, ScoreDistribution, SourceMean, TitlePopularity, UserDispersion,
};
use crate::config::Config;
use crate::dataset::{self, AnimeRecord, JoinError, JoinedTable, LoadError};
use crate::recommend;

/// Fatal pipeline errors. Surfaced verbatim; the dashboard cannot render
/// without a complete join.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    /// A source dataset could not be read
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The datasets could not be joined
    #[error(transparent)]
    Join(#[from] JoinError),
}

/// The five chart selections of the visualize tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visualization {
    /// Score histogram stacked by gender
    ScoreDistribution,
    /// Top-N most-rated titles per gender
    TopRatedByGroup,
    /// Mean score per source category
    MeanScoreBySource,
    /// Rating count vs. mean score per title
    TitlePopularity,
    /// Per-user score standard deviation
    UserScoreDispersion,
}

/// Result of one query dispatch, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "kebab-case")]
pub enum QueryResult {
    ScoreDistribution(ScoreDistribution),
    TopRatedByGroup(Vec<GroupTopTitles>),
    MeanScoreBySource(Vec<SourceMean>),
    TitlePopularity(Vec<TitlePopularity>),
    UserScoreDispersion(Vec<UserDispersion>),
}

impl QueryResult {
    /// True when the query produced no rows; the UI renders a "no data"
    /// state instead of a chart.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryResult::ScoreDistribution(d) => d.bins.is_empty(),
            QueryResult::TopRatedByGroup(groups) => groups.is_empty(),
            QueryResult::MeanScoreBySource(means) => means.is_empty(),
            QueryResult::TitlePopularity(stats) => stats.is_empty(),
            QueryResult::UserScoreDispersion(users) => users.is_empty(),
        }
    }
}

/// Immutable handle over the loaded datasets and their join.
#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    catalog: Vec<AnimeRecord>,
    table: JoinedTable,
}

impl Dashboard {
    /// Load all three datasets and build the joined table. Runs exactly once
    /// per handle; every later call answers from memory.
    pub fn load(config: Config) -> Result<Self, DashboardError> {
        config.validate()?;

        let catalog = dataset::load_anime(&config.data.anime_path)?;
        let ratings = dataset::load_ratings(&config.data.rating_path)?;
        let users = dataset::load_users(&config.data.user_path)?;
        info!(
            anime = catalog.len(),
            ratings = ratings.len(),
            users = users.len(),
            "datasets loaded"
        );

        let table = dataset::merge(&catalog, &ratings, &users)?;
        if table.is_empty() {
            warn!("joined table is empty; every query will report no data");
        }

        Ok(Dashboard {
            config,
            catalog,
            table,
        })
    }

    /// Build a dashboard from already-constructed datasets. Useful when the
    /// caller owns the loading step (tests, embedded use).
    pub fn from_parts(
        config: Config,
        catalog: Vec<AnimeRecord>,
        table: JoinedTable,
    ) -> Result<Self, DashboardError> {
        config.validate()?;
        Ok(Dashboard {
            config,
            catalog,
            table,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &JoinedTable {
        &self.table
    }

    pub fn catalog(&self) -> &[AnimeRecord] {
        &self.catalog
    }

    /// Distinct user ids available to the selector control, sorted.
    pub fn user_ids(&self) -> Vec<i64> {
        self.table.user_ids()
    }

    /// Dispatch one of the five visualization queries.
    pub fn run_query(&self, viz: Visualization) -> QueryResult {
        let result = match viz {
            Visualization::ScoreDistribution => QueryResult::ScoreDistribution(
                analytics::score_distribution(&self.table, self.config.query.histogram_bins),
            ),
            Visualization::TopRatedByGroup => QueryResult::TopRatedByGroup(
                analytics::top_rated_by_group(&self.table, self.config.query.top_n),
            ),
            Visualization::MeanScoreBySource => {
                QueryResult::MeanScoreBySource(analytics::mean_score_by_source(&self.table))
            }
            Visualization::TitlePopularity => {
                QueryResult::TitlePopularity(analytics::title_popularity(&self.table))
            }
            Visualization::UserScoreDispersion => {
                QueryResult::UserScoreDispersion(analytics::user_score_dispersion(&self.table))
            }
        };

        if result.is_empty() {
            warn!(?viz, "query returned no rows");
        }
        result
    }

    /// Recommend up to `n` unseen titles for the user, drawing from the
    /// thread RNG. `n` is clamped to `[1, recommend.max_count]`.
    pub fn recommend(&self, user_id: i64, n: usize) -> Vec<AnimeRecord> {
        let n = self.clamp_count(n);
        let recs = recommend::recommend(&self.table, &self.catalog, user_id, n);
        if recs.is_empty() {
            warn!(user_id, "no unseen titles left to recommend");
        }
        recs
    }

    /// Seeded variant of [`Dashboard::recommend`] for reproducible output.
    pub fn recommend_seeded(&self, user_id: i64, n: usize, seed: u64) -> Vec<AnimeRecord> {
        let n = self.clamp_count(n);
        let mut rng = StdRng::seed_from_u64(seed);
        recommend::recommend_with(&self.table, &self.catalog, user_id, n, &mut rng)
    }

    fn clamp_count(&self, n: usize) -> usize {
        n.clamp(1, self.config.recommend.max_count)
    }
}
