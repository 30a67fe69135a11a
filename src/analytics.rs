//! Query Layer
//!
//! The fixed menu of aggregation queries behind the dashboard's visualize
//! tab. Every query is a pure function over a borrowed [`JoinedTable`]:
//! no side effects, no mutation, and deterministic output ordering so the
//! same table always renders the same charts.
//!
//! | Query                       | Grouping         | Aggregate        |
//! |-----------------------------|------------------|------------------|
//! | [`score_distribution`]      | score bin x gender | count          |
//! | [`top_rated_by_group`]      | gender, name     | count, top N     |
//! | [`mean_score_by_source`]    | source           | mean             |
//! | [`title_popularity`]        | anime_id         | mean, count      |
//! | [`user_score_dispersion`]   | user_id          | sample std dev   |
//!
//! An empty input table yields an empty result for every query; the caller
//! decides how to render the "no data" state.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::JoinedTable;

/// Score histogram stacked by demographic group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    /// Demographic groups present, lexically ordered
    pub groups: Vec<String>,
    /// Equal-width bins over the observed score range, ascending
    pub bins: Vec<ScoreBin>,
}

/// One histogram bucket. `upper` is exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBin {
    pub lower: f64,
    pub upper: f64,
    /// Per-group row counts for this bucket
    pub counts: BTreeMap<String, usize>,
}

/// Most-rated titles for one demographic group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTopTitles {
    pub gender: String,
    /// Descending by count, ties broken by name
    pub titles: Vec<TitleCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleCount {
    pub name: String,
    pub count: usize,
}

/// Mean score for one source category (Manga, Original, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMean {
    pub source: String,
    pub mean_score: f64,
    pub count: usize,
}

/// Scatter-ready (rating count, mean score) pair for one title. The consumer
/// is expected to plot `num_ratings` on a logarithmic axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitlePopularity {
    pub anime_id: i64,
    pub name: String,
    pub mean_score: f64,
    pub num_ratings: usize,
}

/// Sample standard deviation of one user's scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDispersion {
    pub user_id: i64,
    pub std_dev: f64,
    pub num_ratings: usize,
}

/// Bucket scores into `bins` equal-width buckets over the observed range,
/// counting rows per bucket per gender.
///
/// A table whose scores are all equal collapses to a single bucket.
pub fn score_distribution(table: &JoinedTable, bins: usize) -> ScoreDistribution {
    assert!(bins > 0, "bin count must be positive");
    if table.is_empty() {
        return ScoreDistribution::default();
    }

    let (min, max) = table.rows().iter().fold((f64::MAX, f64::MIN), |(lo, hi), r| {
        (lo.min(r.score), hi.max(r.score))
    });

    let bins = if max > min { bins } else { 1 };
    let width = (max - min) / bins as f64;

    let mut buckets: Vec<ScoreBin> = (0..bins)
        .map(|i| ScoreBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            counts: BTreeMap::new(),
        })
        .collect();

    let mut groups: BTreeMap<String, ()> = BTreeMap::new();
    for row in table.rows() {
        let idx = if width > 0.0 {
            (((row.score - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        *buckets[idx].counts.entry(row.gender.clone()).or_insert(0) += 1;
        groups.entry(row.gender.clone()).or_insert(());
    }

    ScoreDistribution {
        groups: groups.into_keys().collect(),
        bins: buckets,
    }
}

/// Count ratings per (gender, name) and keep the `n` most-rated titles for
/// each gender.
///
/// Ordering within a group is count descending, then name ascending, so ties
/// resolve the same way on every run.
pub fn top_rated_by_group(table: &JoinedTable, n: usize) -> Vec<GroupTopTitles> {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for row in table.rows() {
        *counts
            .entry(row.gender.clone())
            .or_default()
            .entry(row.name.clone())
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(gender, by_title)| {
            let mut titles: Vec<TitleCount> = by_title
                .into_iter()
                .map(|(name, count)| TitleCount { name, count })
                .collect();
            titles.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
            titles.truncate(n);
            GroupTopTitles { gender, titles }
        })
        .collect()
}

/// Arithmetic mean of `score` per source category, sorted by mean descending
/// (ties broken by source name).
pub fn mean_score_by_source(table: &JoinedTable) -> Vec<SourceMean> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for row in table.rows() {
        let entry = sums.entry(row.source.clone()).or_insert((0.0, 0));
        entry.0 += row.score;
        entry.1 += 1;
    }

    let mut means: Vec<SourceMean> = sums
        .into_iter()
        .map(|(source, (sum, count))| SourceMean {
            source,
            mean_score: sum / count as f64,
            count,
        })
        .collect();

    means.sort_by(|a, b| {
        b.mean_score
            .partial_cmp(&a.mean_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.source.cmp(&b.source))
    });
    means
}

/// Mean score and rating count per title, ordered by `anime_id`.
pub fn title_popularity(table: &JoinedTable) -> Vec<TitlePopularity> {
    let mut stats: BTreeMap<i64, (String, f64, usize)> = BTreeMap::new();
    for row in table.rows() {
        let entry = stats
            .entry(row.anime_id)
            .or_insert_with(|| (row.name.clone(), 0.0, 0));
        entry.1 += row.score;
        entry.2 += 1;
    }

    stats
        .into_iter()
        .map(|(anime_id, (name, sum, count))| TitlePopularity {
            anime_id,
            name,
            mean_score: sum / count as f64,
            num_ratings: count,
        })
        .collect()
}

/// Sample standard deviation of scores per user, ordered by `user_id`.
///
/// Users with fewer than 2 ratings have no defined sample deviation and are
/// left out entirely rather than reported as zero.
pub fn user_score_dispersion(table: &JoinedTable) -> Vec<UserDispersion> {
    let mut scores: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for row in table.rows() {
        scores.entry(row.user_id).or_default().push(row.score);
    }

    scores
        .into_iter()
        .filter(|(_, xs)| xs.len() >= 2)
        .map(|(user_id, xs)| {
            let n = xs.len();
            let mean = xs.iter().sum::<f64>() / n as f64;
            let variance = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            UserDispersion {
                user_id,
                std_dev: variance.sqrt(),
                num_ratings: n,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::JoinedRow;

    fn row(user_id: i64, anime_id: i64, name: &str, source: &str, score: f64, gender: &str) -> JoinedRow {
        JoinedRow {
            user_id,
            anime_id,
            name: name.to_string(),
            genre: "Action".to_string(),
            source: source.to_string(),
            score,
            gender: gender.to_string(),
        }
    }

    fn table(rows: Vec<JoinedRow>) -> JoinedTable {
        JoinedTable::new(rows)
    }

    // score_distribution

    #[test]
    fn test_distribution_bin_count_and_range() {
        let t = table(vec![
            row(1, 1, "A", "Manga", 1.0, "Male"),
            row(2, 1, "A", "Manga", 10.0, "Female"),
        ]);
        let dist = score_distribution(&t, 10);
        assert_eq!(dist.bins.len(), 10);
        assert!((dist.bins[0].lower - 1.0).abs() < 1e-9);
        assert!((dist.bins[9].upper - 10.0).abs() < 1e-9);
        assert_eq!(dist.groups, vec!["Female".to_string(), "Male".to_string()]);
    }

    #[test]
    fn test_distribution_counts_per_group() {
        let t = table(vec![
            row(1, 1, "A", "Manga", 0.0, "Male"),
            row(2, 1, "A", "Manga", 0.0, "Female"),
            row(3, 1, "A", "Manga", 10.0, "Female"),
        ]);
        let dist = score_distribution(&t, 2);
        assert_eq!(dist.bins[0].counts.get("Male"), Some(&1));
        assert_eq!(dist.bins[0].counts.get("Female"), Some(&1));
        assert_eq!(dist.bins[1].counts.get("Female"), Some(&1));
        assert_eq!(dist.bins[1].counts.get("Male"), None);
    }

    #[test]
    fn test_distribution_max_score_lands_in_last_bin() {
        let t = table(vec![
            row(1, 1, "A", "Manga", 0.0, "Male"),
            row(2, 1, "A", "Manga", 10.0, "Male"),
        ]);
        let dist = score_distribution(&t, 10);
        assert_eq!(dist.bins[9].counts.get("Male"), Some(&1));
    }

    #[test]
    fn test_distribution_degenerate_range_single_bin() {
        let t = table(vec![
            row(1, 1, "A", "Manga", 7.0, "Male"),
            row(2, 1, "A", "Manga", 7.0, "Female"),
        ]);
        let dist = score_distribution(&t, 10);
        assert_eq!(dist.bins.len(), 1);
        assert_eq!(dist.bins[0].counts.values().sum::<usize>(), 2);
    }

    #[test]
    fn test_distribution_empty_table() {
        let dist = score_distribution(&JoinedTable::default(), 10);
        assert!(dist.bins.is_empty());
        assert!(dist.groups.is_empty());
    }

    #[test]
    fn test_distribution_total_count_preserved() {
        let rows: Vec<JoinedRow> = (0..37)
            .map(|i| row(i, 1, "A", "Manga", f64::from(i as i32) * 0.27, "Male"))
            .collect();
        let t = table(rows);
        let dist = score_distribution(&t, 10);
        let total: usize = dist.bins.iter().flat_map(|b| b.counts.values()).sum();
        assert_eq!(total, 37);
    }

    // top_rated_by_group

    #[test]
    fn test_top_rated_takes_n_per_group() {
        let mut rows = Vec::new();
        for (name, count) in [("A", 3i64), ("B", 2), ("C", 1)] {
            for i in 0..count {
                rows.push(row(i, 1, name, "Manga", 8.0, "Male"));
            }
        }
        let top = top_rated_by_group(&table(rows), 2);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].gender, "Male");
        assert_eq!(top[0].titles.len(), 2);
        assert_eq!(top[0].titles[0].name, "A");
        assert_eq!(top[0].titles[0].count, 3);
        assert_eq!(top[0].titles[1].name, "B");
    }

    #[test]
    fn test_top_rated_tie_breaks_by_name() {
        let rows = vec![
            row(1, 1, "Zeta", "Manga", 8.0, "Male"),
            row(2, 2, "Alpha", "Manga", 8.0, "Male"),
        ];
        let top = top_rated_by_group(&table(rows), 5);
        assert_eq!(top[0].titles[0].name, "Alpha");
        assert_eq!(top[0].titles[1].name, "Zeta");
    }

    #[test]
    fn test_top_rated_groups_are_independent() {
        let rows = vec![
            row(1, 1, "A", "Manga", 8.0, "Male"),
            row(2, 1, "A", "Manga", 8.0, "Female"),
            row(3, 2, "B", "Manga", 8.0, "Female"),
        ];
        let top = top_rated_by_group(&table(rows), 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].gender, "Female");
        assert_eq!(top[0].titles.len(), 2);
        assert_eq!(top[1].gender, "Male");
        assert_eq!(top[1].titles.len(), 1);
    }

    #[test]
    fn test_top_rated_empty_table() {
        assert!(top_rated_by_group(&JoinedTable::default(), 5).is_empty());
    }

    // mean_score_by_source

    #[test]
    fn test_mean_by_source_values_and_order() {
        let rows = vec![
            row(1, 1, "A", "Manga", 6.0, "Male"),
            row(2, 1, "A", "Manga", 8.0, "Male"),
            row(3, 2, "B", "Original", 9.0, "Male"),
        ];
        let means = mean_score_by_source(&table(rows));
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].source, "Original");
        assert!((means[0].mean_score - 9.0).abs() < 1e-9);
        assert_eq!(means[1].source, "Manga");
        assert!((means[1].mean_score - 7.0).abs() < 1e-9);
        assert_eq!(means[1].count, 2);
    }

    #[test]
    fn test_mean_by_source_tie_breaks_by_name() {
        let rows = vec![
            row(1, 1, "A", "Novel", 7.0, "Male"),
            row(2, 2, "B", "Game", 7.0, "Male"),
        ];
        let means = mean_score_by_source(&table(rows));
        assert_eq!(means[0].source, "Game");
        assert_eq!(means[1].source, "Novel");
    }

    // title_popularity

    #[test]
    fn test_title_popularity_pairs() {
        let rows = vec![
            row(1, 1, "A", "Manga", 6.0, "Male"),
            row(2, 1, "A", "Manga", 8.0, "Female"),
            row(3, 2, "B", "Manga", 9.0, "Male"),
        ];
        let stats = title_popularity(&table(rows));
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].anime_id, 1);
        assert_eq!(stats[0].num_ratings, 2);
        assert!((stats[0].mean_score - 7.0).abs() < 1e-9);
        assert_eq!(stats[1].name, "B");
        assert_eq!(stats[1].num_ratings, 1);
    }

    // user_score_dispersion

    #[test]
    fn test_dispersion_excludes_single_rating_users() {
        let rows = vec![
            row(1, 1, "A", "Manga", 6.0, "Male"),
            row(1, 2, "B", "Manga", 8.0, "Male"),
            row(2, 1, "A", "Manga", 9.0, "Female"),
        ];
        let dispersion = user_score_dispersion(&table(rows));
        assert_eq!(dispersion.len(), 1);
        assert_eq!(dispersion[0].user_id, 1);
        assert_eq!(dispersion[0].num_ratings, 2);
    }

    #[test]
    fn test_dispersion_sample_std_dev() {
        // scores 2, 4, 4, 4, 5, 5, 7, 9: mean 5, sample variance 32/7
        let scores = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let rows: Vec<JoinedRow> = scores
            .iter()
            .enumerate()
            .map(|(i, &s)| row(1, i as i64, "A", "Manga", s, "Male"))
            .collect();
        let dispersion = user_score_dispersion(&table(rows));
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((dispersion[0].std_dev - expected).abs() < 1e-9);
    }

    #[test]
    fn test_dispersion_identical_scores_is_zero() {
        let rows = vec![
            row(1, 1, "A", "Manga", 7.0, "Male"),
            row(1, 2, "B", "Manga", 7.0, "Male"),
        ];
        let dispersion = user_score_dispersion(&table(rows));
        assert!(dispersion[0].std_dev.abs() < 1e-12);
    }

    #[test]
    fn test_dispersion_empty_table() {
        assert!(user_score_dispersion(&JoinedTable::default()).is_empty());
    }
}
