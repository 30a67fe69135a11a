//! Dataset Error Types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a source dataset.
///
/// All variants are fatal: a dataset that cannot be read in full leaves the
/// dashboard with nothing to render, so there is no retry or partial load.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed CSV content, a missing required column, or a field that
    /// failed typed deserialization
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for dataset loading
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while joining the three datasets.
///
/// Zero joined rows is not an error; a dimension table that breaks its own
/// uniqueness invariant is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// The anime dataset contains the same anime_id more than once
    #[error("duplicate anime_id {0} in anime dataset")]
    DuplicateAnimeId(i64),

    /// The user dataset contains the same user_id more than once
    #[error("duplicate user_id {0} in user dataset")]
    DuplicateUserId(i64),
}
