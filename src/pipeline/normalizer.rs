//! Field cleanup, type coercion and median imputation.
//!
//! Coercion always runs before imputation, so "missing" means a null cell no
//! matter whether the source was empty, malformed or a placeholder token.

use super::columns;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// A numeric column whose gaps were filled with its median.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImputedColumn {
    pub column: String,
    pub filled: usize,
    pub median: f64,
}

/// What the normalizer changed beyond plain coercion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizeReport {
    pub imputed: Vec<ImputedColumn>,
    /// Missing categorical cells replaced with the unknown sentinel, per column
    pub unknown_categories: BTreeMap<String, usize>,
}

/// Cleans text fields, coerces numeric fields and imputes numeric gaps.
///
/// # Errors
///
/// - [`PrepError::MissingColumns`] if a transformed column is absent
/// - [`PrepError::TypeCoercion`] if a strict integer field or `bpm` holds a
///   missing or unparseable cell
pub fn normalize(df: DataFrame) -> Result<(DataFrame, NormalizeReport)> {
    let mut report = NormalizeReport::default();
    for name in columns::CATEGORICAL {
        let filled = columns::series(&df, name)?.null_count();
        if filled > 0 {
            tracing::warn!(column = name, filled, "Missing categories set to sentinel");
            report.unknown_categories.insert(name.to_owned(), filled);
        }
    }

    let mut df = df
        .lazy()
        .with_columns([
            text(columns::TRACK_NAME).str().strip_chars(lit(NULL)),
            category(columns::KEY).str().to_uppercase(),
            category(columns::MODE),
        ])
        .collect()?;
    map_text(&mut df, columns::ARTIST_NAME, |s| title_case(&space_commas(s)))?;
    map_text(&mut df, columns::MODE, capitalize)?;

    for name in columns::STRICT_INTEGER {
        coerce_strict_int(&mut df, name)?;
    }
    for name in columns::NULLABLE_NUMERIC {
        coerce_lenient_float(&mut df, name)?;
    }
    coerce_strict_float(&mut df, columns::BPM)?;

    let (df, imputed) = impute_medians(df)?;
    report.imputed = imputed;
    Ok((df, report))
}

/// Replaces missing cells (null or NaN) in every numeric column with the
/// median of that column's observed values.
///
/// Integer columns with gaps are promoted to `Float64`. Columns without gaps
/// are left untouched, so a second pass changes nothing.
///
/// # Errors
///
/// Returns an error if polars fails to cast or replace a column.
pub fn impute_medians(df: DataFrame) -> Result<(DataFrame, Vec<ImputedColumn>)> {
    let numeric: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| c.name().to_string())
        .collect();
    if numeric.is_empty() {
        return Ok((df, Vec::new()));
    }

    let aggregates: Vec<Expr> = numeric
        .iter()
        .flat_map(|name| {
            [
                observed(name).null_count().alias(format!("{name}:gaps")),
                observed(name).median().alias(format!("{name}:median")),
            ]
        })
        .collect();
    let stats = df.clone().lazy().select(aggregates).collect()?;

    let mut imputed = Vec::new();
    let mut fills = Vec::new();
    for name in numeric {
        let filled = stat(&stats, &format!("{name}:gaps"))?.unwrap_or(0.0) as usize;
        if filled == 0 {
            continue;
        }
        let Some(median) = stat(&stats, &format!("{name}:median"))? else {
            tracing::warn!(column = %name, "Column has no observed values, leaving it unfilled");
            continue;
        };

        tracing::debug!(column = %name, filled, median, "Imputed missing values");
        let expr = observed(&name);
        fills.push(expr.clone().fill_null(expr.median()));
        imputed.push(ImputedColumn {
            column: name,
            filled,
            median,
        });
    }

    if fills.is_empty() {
        return Ok((df, imputed));
    }
    let df = df.lazy().with_columns(fills).collect()?;
    Ok((df, imputed))
}

/// A column as text.
fn text(name: &str) -> Expr {
    col(name).cast(DataType::String)
}

/// A categorical column as text with gaps set to the unknown sentinel.
fn category(name: &str) -> Expr {
    text(name).fill_null(lit(columns::UNKNOWN_CATEGORY))
}

/// A numeric column as `Float64` with NaN counted as missing.
fn observed(name: &str) -> Expr {
    col(name).cast(DataType::Float64).fill_nan(lit(NULL))
}

/// Reads a one-row aggregate as `f64`.
fn stat(stats: &DataFrame, name: &str) -> Result<Option<f64>> {
    let value = columns::series(stats, name)?.cast(&DataType::Float64)?;
    Ok(value.f64()?.get(0))
}

fn map_text(df: &mut DataFrame, name: &str, f: impl Fn(&str) -> String) -> Result<()> {
    let text = columns::series(df, name)?.cast(&DataType::String)?;
    let values: Vec<Option<String>> = text.str()?.into_iter().map(|v| v.map(&f)).collect();
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

fn coerce_strict_int(df: &mut DataFrame, name: &str) -> Result<()> {
    const TARGET: &str = "integer";
    let series = columns::series(df, name)?;
    let dtype = series.dtype().clone();

    let values: Vec<i64> = if dtype.is_integer() {
        let ints = series.cast(&DataType::Int64)?;
        ints.i64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| v.ok_or_else(|| coercion_error(name, row, None, TARGET)))
            .collect::<Result<_>>()?
    } else if dtype.is_float() {
        let floats = series.cast(&DataType::Float64)?;
        floats
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                // Fractional counts truncate toward zero.
                Some(x) if x.is_finite() => Ok(x.trunc() as i64),
                Some(x) => Err(coercion_error(name, row, Some(&x.to_string()), TARGET)),
                None => Err(coercion_error(name, row, None, TARGET)),
            })
            .collect::<Result<_>>()?
    } else {
        let text = series.cast(&DataType::String)?;
        text.str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.and_then(parse_strict_int)
                    .ok_or_else(|| coercion_error(name, row, v, TARGET))
            })
            .collect::<Result<_>>()?
    };

    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

fn coerce_strict_float(df: &mut DataFrame, name: &str) -> Result<()> {
    const TARGET: &str = "float";
    let series = columns::series(df, name)?;

    let values: Vec<f64> = if series.dtype().is_primitive_numeric() {
        let floats = series.cast(&DataType::Float64)?;
        floats
            .f64()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(x) if x.is_finite() => Ok(x),
                Some(x) => Err(coercion_error(name, row, Some(&x.to_string()), TARGET)),
                None => Err(coercion_error(name, row, None, TARGET)),
            })
            .collect::<Result<_>>()?
    } else {
        let text = series.cast(&DataType::String)?;
        text.str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.and_then(parse_strict_float)
                    .ok_or_else(|| coercion_error(name, row, v, TARGET))
            })
            .collect::<Result<_>>()?
    };

    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

fn coerce_lenient_float(df: &mut DataFrame, name: &str) -> Result<()> {
    let series = columns::series(df, name)?;

    let values: Vec<Option<f64>> = if series.dtype().is_primitive_numeric() {
        let floats = series.cast(&DataType::Float64)?;
        floats
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect()
    } else {
        let text = series.cast(&DataType::String)?;
        text.str()?
            .into_iter()
            .map(|v| v.and_then(parse_lenient_float))
            .collect()
    };

    let rejected = values.iter().filter(|v| v.is_none()).count();
    if rejected > 0 {
        tracing::debug!(column = name, rejected, "Non-numeric cells marked missing");
    }
    df.with_column(Series::new(name.into(), values))?;
    Ok(())
}

fn coercion_error(column: &str, row: usize, value: Option<&str>, target: &'static str) -> PrepError {
    PrepError::TypeCoercion {
        column: column.to_owned(),
        row,
        value: value.unwrap_or("<missing>").to_owned(),
        target,
    }
}

/// Parses a whole number, ignoring surrounding whitespace.
pub fn parse_strict_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Parses a finite float, ignoring surrounding whitespace.
pub fn parse_strict_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Like [`parse_strict_float`]; callers turn `None` into a missing cell
/// rather than an error. Thousands separators are not accepted.
pub fn parse_lenient_float(raw: &str) -> Option<f64> {
    parse_strict_float(raw)
}

/// Puts exactly one space after every comma, absorbing any whitespace that
/// already follows it: `"Bob,Alice"` and `"Bob,   Alice"` both become
/// `"Bob, Alice"`.
pub fn space_commas(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == ',' {
            while chars.next_if(|n| n.is_whitespace()).is_some() {}
            out.push(' ');
        }
    }
    out
}

/// Uppercases every letter that does not follow another letter and
/// lowercases the rest, so `"mc o'NEIL"` becomes `"Mc O'Neil"`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut after_letter = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
