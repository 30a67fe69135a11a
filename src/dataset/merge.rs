//! Join/Merge Engine
//!
//! Combines the three datasets into the single denormalized [`JoinedTable`]:
//! ratings are inner-joined to anime on `anime_id`, then to users on
//! `user_id`. A rating whose key does not resolve in either dimension table
//! is dropped, so the join never has more rows than the ratings input.
//!
//! Output order is the rating input order with dropped rows elided, which
//! keeps the table deterministic for deterministic inputs.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::dataset::error::JoinError;
use crate::dataset::{AnimeRecord, JoinedRow, JoinedTable, RatingRecord, UserRecord};

/// Inner-join the three datasets into one wide table.
///
/// Fails if a dimension table repeats its key; returns an empty table (not an
/// error) when nothing resolves.
pub fn merge(
    anime: &[AnimeRecord],
    ratings: &[RatingRecord],
    users: &[UserRecord],
) -> Result<JoinedTable, JoinError> {
    let anime_by_id = index_anime(anime)?;
    let users_by_id = index_users(users)?;

    let mut rows = Vec::with_capacity(ratings.len());
    let mut dropped = 0usize;

    for rating in ratings {
        let (Some(anime), Some(user)) = (
            anime_by_id.get(&rating.anime_id),
            users_by_id.get(&rating.user_id),
        ) else {
            dropped += 1;
            continue;
        };

        rows.push(JoinedRow {
            user_id: rating.user_id,
            anime_id: rating.anime_id,
            name: anime.name.clone(),
            genre: anime.genre.clone(),
            source: anime.source.clone(),
            score: rating.score,
            gender: user.gender.clone(),
        });
    }

    info!(
        joined = rows.len(),
        dropped, "merged anime, rating, and user datasets"
    );
    Ok(JoinedTable::new(rows))
}

fn index_anime(anime: &[AnimeRecord]) -> Result<HashMap<i64, &AnimeRecord>, JoinError> {
    let mut index = HashMap::with_capacity(anime.len());
    for record in anime {
        if index.insert(record.anime_id, record).is_some() {
            return Err(JoinError::DuplicateAnimeId(record.anime_id));
        }
    }
    debug!(titles = index.len(), "indexed anime dataset");
    Ok(index)
}

fn index_users(users: &[UserRecord]) -> Result<HashMap<i64, &UserRecord>, JoinError> {
    let mut index = HashMap::with_capacity(users.len());
    for record in users {
        if index.insert(record.user_id, record).is_some() {
            return Err(JoinError::DuplicateUserId(record.user_id));
        }
    }
    debug!(users = index.len(), "indexed user dataset");
    Ok(index)
}
