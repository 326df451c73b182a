//! Fixed column roles of the chart dataset.

use crate::error::{PrepError, Result};
use polars::prelude::{DataFrame, Series};

/// Free-text title, trimmed.
pub const TRACK_NAME: &str = "track_name";

/// Comma-separated artist list, spaced and title-cased.
pub const ARTIST_NAME: &str = "artist(s)_name";

/// Counts and date parts that must parse as integers.
pub const STRICT_INTEGER: [&str; 8] = [
    "released_year",
    "released_month",
    "released_day",
    "in_spotify_playlists",
    "in_spotify_charts",
    "in_apple_playlists",
    "in_apple_charts",
    "in_deezer_charts",
];

/// Numeric columns whose upstream data contains placeholder tokens.
/// Unparseable cells become nulls instead of failing the run.
pub const NULLABLE_NUMERIC: [&str; 3] = ["streams", "in_deezer_playlists", "in_shazam_charts"];

/// Audio feature scores, imputed like any other numeric column.
pub const PERCENT_FEATURES: [&str; 7] = [
    "danceability_%",
    "valence_%",
    "energy_%",
    "acousticness_%",
    "instrumentalness_%",
    "liveness_%",
    "speechiness_%",
];

pub const KEY: &str = "key";
pub const MODE: &str = "mode";

/// Columns replaced by indicator columns.
pub const CATEGORICAL: [&str; 2] = [KEY, MODE];

pub const BPM: &str = "bpm";
pub const BPM_NORMALIZED: &str = "bpm_normalized";

/// Stand-in for a missing `key` or `mode` value, applied before casing.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Every column the source must provide, in canonical order.
pub fn required() -> impl Iterator<Item = &'static str> {
    [TRACK_NAME, ARTIST_NAME]
        .into_iter()
        .chain(STRICT_INTEGER)
        .chain(NULLABLE_NUMERIC)
        .chain(PERCENT_FEATURES)
        .chain([BPM, KEY, MODE])
}

/// Looks up a column as a materialized series.
///
/// # Errors
///
/// [`PrepError::MissingColumns`] if the frame has no such column.
pub fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    match df.column(name) {
        Ok(column) => Ok(column.as_materialized_series()),
        Err(_) => Err(PrepError::MissingColumns(vec![name.to_owned()])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_required_columns_are_distinct() {
        let all: Vec<_> = required().collect();
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(all.len(), 23);
        assert_eq!(unique.len(), all.len(), "duplicate column role");
    }
}
