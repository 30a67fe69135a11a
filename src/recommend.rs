//! Recommendation Stub
//!
//! Placeholder recommender: the set of titles the user has already rated is
//! subtracted from the catalog and a uniform random sample of the remainder
//! is returned. No model, no scoring; a real recommender would slot in behind
//! the same signature.
//!
//! Randomness is injected so callers that need reproducibility (tests, the
//! seeded facade path) can pin an RNG; the convenience wrapper draws from the
//! thread RNG and is deliberately not deterministic across calls.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::{AnimeRecord, JoinedTable};

/// Sample up to `n` titles the user has not rated, using the supplied RNG.
///
/// The sample is uniform and without replacement. `n` larger than the unseen
/// set clamps to the whole unseen set; a user who has rated the entire
/// catalog gets an empty list. A `user_id` with no rating history is treated
/// as a new user whose candidate set is the full catalog.
pub fn recommend_with<R: Rng + ?Sized>(
    table: &JoinedTable,
    catalog: &[AnimeRecord],
    user_id: i64,
    n: usize,
    rng: &mut R,
) -> Vec<AnimeRecord> {
    let seen = table.rated_by(user_id);
    let unseen: Vec<&AnimeRecord> = catalog
        .iter()
        .filter(|a| !seen.contains(&a.anime_id))
        .collect();

    unseen
        .choose_multiple(rng, n.min(unseen.len()))
        .map(|a| (*a).clone())
        .collect()
}

/// [`recommend_with`] using the thread-local RNG.
pub fn recommend(
    table: &JoinedTable,
    catalog: &[AnimeRecord],
    user_id: i64,
    n: usize,
) -> Vec<AnimeRecord> {
    recommend_with(table, catalog, user_id, n, &mut rand::thread_rng())
}
