//! Console diagnostics for a finished run. Informational only.

use super::PipelineOutcome;
use polars::prelude::DataFrame;
use std::fmt::Write as _;

/// Titled preview of a frame's first rows.
pub fn preview(title: &str, df: &DataFrame) -> String {
    format!("{title}:\n{df}")
}

/// Names of columns containing `needle`, e.g. `"key_"`.
pub fn related_columns(df: &DataFrame, needle: &str) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .filter(|name| name.contains(needle))
        .map(ToString::to_string)
        .collect()
}

/// Multi-line summary of imputation, encoding and scaling.
pub fn summary(outcome: &PipelineOutcome) -> String {
    let mut out = String::new();
    let (rows_in, cols_in) = outcome.input_shape;
    let (rows_out, cols_out) = outcome.output_shape;

    let _ = writeln!(out, "Rows: {rows_in} -> {rows_out}");
    let _ = writeln!(out, "Columns: {cols_in} -> {cols_out}");

    if outcome.normalize.imputed.is_empty() {
        let _ = writeln!(out, "Imputation: no missing numeric values");
    } else {
        let _ = writeln!(out, "Imputation (median):");
        for col in &outcome.normalize.imputed {
            let _ = writeln!(
                out,
                "  {}: {} filled with {}",
                col.column, col.filled, col.median
            );
        }
    }

    for (column, count) in &outcome.normalize.unknown_categories {
        let _ = writeln!(out, "Unknown {column}: {count} rows");
    }

    for encoded in &outcome.encoded {
        let _ = writeln!(
            out,
            "Encoded '{}' into {} indicator columns",
            encoded.source,
            encoded.indicators.len()
        );
    }

    let _ = writeln!(
        out,
        "Scaled bpm: mean {:.4}, std {:.4}",
        outcome.scale.mean, outcome.scale.std_dev
    );
    let _ = write!(
        out,
        "Saved to {} in {:.2?}",
        outcome.output_path.display(),
        outcome.duration
    );
    out
}
