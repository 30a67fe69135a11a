//! # Aniboard Analytics Pipeline
//!
//! Backend for an anime analytics dashboard: three CSV datasets are loaded
//! once, joined into a single denormalized table, and served to a fixed menu
//! of aggregation queries plus a sampling-based recommendation stub. The
//! rendering surface (widgets, charts, page layout) is an external
//! collaborator that calls into this crate and draws its outputs.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! anime.csv ──┐
//! rating.csv ─┼─ [dataset::loader] ─→ [dataset::merge] ─→ JoinedTable
//! user.csv ───┘                                              │
//!                          ┌─────────────────────────────────┤
//!                          ↓                                 ↓
//!                  [analytics] five queries         [recommend] stub
//!                          ↓                                 ↓
//!                     chart tables                  sampled titles
//! ```
//!
//! The [`dashboard::Dashboard`] facade owns the load-once lifecycle: build it
//! from a [`config::Config`], keep it for the process lifetime, and dispatch
//! viewer selections into it. The table is immutable after construction, so
//! the handle is freely shareable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use aniboard::{Config, Dashboard, Visualization};
//!
//! let config = Config::load()?;
//! let dashboard = Dashboard::load(config)?;
//!
//! // Visualize tab
//! let chart = dashboard.run_query(Visualization::MeanScoreBySource);
//!
//! // Recommend tab
//! let picks = dashboard.recommend(user_id, 5);
//! ```

pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod recommend;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardError, QueryResult, Visualization};
pub use dataset::{
    AnimeRecord, JoinError, JoinedRow, JoinedTable, LoadError, RatingRecord, UserRecord,
};
