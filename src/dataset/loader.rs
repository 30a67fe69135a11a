//! CSV Dataset Loader
//!
//! Reads the three source files into typed record vectors. The first row of
//! each file is a header; columns are matched by name, extra columns are
//! ignored, and a missing required column or an untypeable field fails the
//! whole load.
//!
//! ## Required columns
//!
//! | File   | Columns                          |
//! |--------|----------------------------------|
//! | anime  | anime_id, name, genre, source    |
//! | rating | user_id, anime_id, score         |
//! | user   | user_id, gender                  |

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dataset::error::{LoadError, LoadResult};
use crate::dataset::{AnimeRecord, RatingRecord, UserRecord};

/// Load the anime metadata dataset.
pub fn load_anime<P: AsRef<Path>>(path: P) -> LoadResult<Vec<AnimeRecord>> {
    load_records(path.as_ref())
}

/// Load the ratings dataset.
pub fn load_ratings<P: AsRef<Path>>(path: P) -> LoadResult<Vec<RatingRecord>> {
    load_records(path.as_ref())
}

/// Load the user demographics dataset.
pub fn load_users<P: AsRef<Path>>(path: P) -> LoadResult<Vec<UserRecord>> {
    load_records(path.as_ref())
}

/// Read every row of a headered CSV file into typed records.
fn load_records<T: DeserializeOwned>(path: &Path) -> LoadResult<Vec<T>> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: T = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        records.push(record);
    }

    debug!(path = %path.display(), rows = records.len(), "loaded dataset");
    Ok(records)
}
