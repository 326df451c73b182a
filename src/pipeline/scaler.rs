//! Z-score standardisation of a numeric column.

use super::columns;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::Serialize;

/// Statistics the column was standardised with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScaleStats {
    pub mean: f64,
    /// Population standard deviation (ddof = 0)
    pub std_dev: f64,
}

/// Writes `(x - mean) / std_dev` of `source` into a new `Float64` column
/// `target` appended at the end, then drops `source`.
///
/// The population standard deviation is used, so the output has exactly
/// unit variance under the same convention.
///
/// # Errors
///
/// - [`PrepError::MissingColumns`] if `source` is absent
/// - [`PrepError::TypeCoercion`] if `source` holds a missing value
/// - [`PrepError::DegenerateScale`] if `source` is empty, constant or has a
///   non-finite spread
pub fn standardize(mut df: DataFrame, source: &str, target: &str) -> Result<(DataFrame, ScaleStats)> {
    let floats = columns::series(&df, source)?.cast(&DataType::Float64)?;
    let values = floats.f64()?;

    if let Some(row) = values.into_iter().position(|v| v.is_none()) {
        return Err(PrepError::TypeCoercion {
            column: source.to_owned(),
            row,
            value: "<missing>".to_owned(),
            target: "float",
        });
    }

    let degenerate = |std_dev: f64| PrepError::DegenerateScale {
        column: source.to_owned(),
        std_dev,
    };
    let mean = values.mean().ok_or_else(|| degenerate(f64::NAN))?;
    let std_dev = values.std(0).ok_or_else(|| degenerate(f64::NAN))?;
    // Identical fractional values leave rounding noise in the spread.
    let constant = values.min() == values.max();
    if constant || !std_dev.is_finite() || std_dev <= spread_floor(mean) {
        return Err(degenerate(std_dev));
    }

    let scaled: Vec<f64> = values
        .into_iter()
        .flatten()
        .map(|x| (x - mean) / std_dev)
        .collect();
    df.with_column(Series::new(target.into(), scaled))?;
    df.drop_in_place(source)?;

    tracing::debug!(column = source, mean, std_dev, "Standardised column");
    Ok((df, ScaleStats { mean, std_dev }))
}

/// Smallest spread not attributable to floating-point error around `mean`.
fn spread_floor(mean: f64) -> f64 {
    f64::EPSILON * mean.abs().max(1.0) * 10.0
}
