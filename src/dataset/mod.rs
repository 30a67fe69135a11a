//! # Dataset Layer
//!
//! Typed records for the three source datasets and the denormalized table
//! produced by joining them. Every container here is built once at startup
//! and never mutated afterwards; downstream consumers hold shared references.
//!
//! ## Pipeline
//!
//! ```text
//! anime.csv ──┐
//! rating.csv ─┼─ [loader] ─→ typed records ─ [merge] ─→ JoinedTable
//! user.csv ───┘
//! ```
//!
//! Column typing is explicit: identifiers are `i64`, scores are `f64`, text
//! fields are `String`. A file that does not satisfy the schema fails the
//! load; there is no dynamic-column fallback.

pub mod error;
pub mod loader;
pub mod merge;

pub use error::{JoinError, LoadError, LoadResult};
pub use loader::{load_anime, load_ratings, load_users};
pub use merge::merge;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One anime title from the metadata dataset. `anime_id` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    pub anime_id: i64,
    pub name: String,
    pub genre: String,
    pub source: String,
}

/// One (user, anime, score) rating. Pairs need not be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub user_id: i64,
    pub anime_id: i64,
    pub score: f64,
}

/// One user from the demographics dataset. `user_id` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub gender: String,
}

/// One row of the denormalized join: a rating widened with the fields of its
/// anime and its user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub user_id: i64,
    pub anime_id: i64,
    pub name: String,
    pub genre: String,
    pub source: String,
    pub score: f64,
    pub gender: String,
}

/// The single denormalized table every query runs against.
///
/// Row order is the rating input order with unresolvable rows elided, so the
/// table is deterministic given deterministic inputs. The table is immutable
/// after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinedTable {
    rows: Vec<JoinedRow>,
}

impl JoinedTable {
    pub(crate) fn new(rows: Vec<JoinedRow>) -> Self {
        JoinedTable { rows }
    }

    pub fn rows(&self) -> &[JoinedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct user ids present in the table, sorted ascending.
    pub fn user_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .rows
            .iter()
            .map(|r| r.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Set of anime ids the given user has rated.
    pub fn rated_by(&self, user_id: i64) -> HashSet<i64> {
        self.rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.anime_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_id: i64, anime_id: i64, score: f64) -> JoinedRow {
        JoinedRow {
            user_id,
            anime_id,
            name: format!("anime-{anime_id}"),
            genre: "Action".to_string(),
            source: "Manga".to_string(),
            score,
            gender: "Female".to_string(),
        }
    }

    #[test]
    fn test_user_ids_sorted_and_distinct() {
        let table = JoinedTable::new(vec![row(7, 1, 8.0), row(3, 2, 6.0), row(7, 2, 9.0)]);
        assert_eq!(table.user_ids(), vec![3, 7]);
    }

    #[test]
    fn test_rated_by_collects_history() {
        let table = JoinedTable::new(vec![row(1, 10, 8.0), row(1, 20, 7.0), row(2, 10, 5.0)]);
        let history = table.rated_by(1);
        assert_eq!(history.len(), 2);
        assert!(history.contains(&10));
        assert!(history.contains(&20));
    }

    #[test]
    fn test_rated_by_unknown_user_is_empty() {
        let table = JoinedTable::new(vec![row(1, 10, 8.0)]);
        assert!(table.rated_by(99).is_empty());
    }

    #[test]
    fn test_empty_table() {
        let table = JoinedTable::default();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.user_ids().is_empty());
    }
}
