//! One-hot encoding of categorical columns.

use super::columns;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Indicator columns generated for one source column, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedColumn {
    pub source: String,
    pub indicators: Vec<String>,
}

/// Replaces each `sources` column with one `Int32` indicator column per
/// distinct value, named `<source>_<value>`.
///
/// Categories are ordered lexicographically by byte value. Indicators are
/// appended after the existing columns, source by source, and the source
/// columns are dropped. Every row gets exactly one 1 per source.
///
/// # Errors
///
/// - [`PrepError::MissingColumns`] if a source column is absent
/// - [`PrepError::Encoding`] if a source holds a missing value or an
///   indicator name collides with an existing column
pub fn one_hot_encode(
    mut df: DataFrame,
    sources: &[&str],
) -> Result<(DataFrame, Vec<EncodedColumn>)> {
    let mut encoded = Vec::with_capacity(sources.len());
    let mut indicators = Vec::new();
    let mut taken: HashSet<String> = HashSet::new();

    for &source in sources {
        let values = category_values(&df, source)?;
        let categories: BTreeSet<&str> = values.iter().map(String::as_str).collect();

        let mut names = Vec::with_capacity(categories.len());
        for category in categories {
            let name = format!("{source}_{category}");
            if df.get_column_index(&name).is_some() || !taken.insert(name.clone()) {
                return Err(PrepError::Encoding {
                    column: source.to_owned(),
                    row: None,
                    reason: format!("indicator column '{name}' already exists"),
                });
            }

            let flags: Vec<i32> = values
                .iter()
                .map(|v| i32::from(v.as_str() == category))
                .collect();
            indicators.push(Series::new(name.as_str().into(), flags));
            names.push(name);
        }

        tracing::debug!(column = source, categories = names.len(), "Encoded column");
        encoded.push(EncodedColumn {
            source: source.to_owned(),
            indicators: names,
        });
    }

    for indicator in indicators {
        df.with_column(indicator)?;
    }
    for &source in sources {
        df.drop_in_place(source)?;
    }
    Ok((df, encoded))
}

fn category_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let text = columns::series(df, column)?.cast(&DataType::String)?;
    text.str()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(str::to_owned).ok_or_else(|| PrepError::Encoding {
                column: column.to_owned(),
                row: Some(row),
                reason: "missing value".to_owned(),
            })
        })
        .collect()
}
