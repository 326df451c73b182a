//! Reads the chart CSV into a typed `DataFrame`.

use super::columns;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Loads a delimited file with a header row, inferring column types over
/// every row.
///
/// # Errors
///
/// - [`PrepError::SourceNotFound`] if `path` is not a file
/// - [`PrepError::MalformedSource`] if the header is missing or a record has
///   a different field count than the header
pub fn load_dataset(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(PrepError::SourceNotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let text = decode_source(&bytes);
    check_structure(path, &text)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()
        .map_err(|e| PrepError::MalformedSource {
            path: path.to_path_buf(),
            line: None,
            reason: e.to_string(),
        })?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded source"
    );
    Ok(df)
}

/// Decodes raw file bytes, falling back to Windows-1252 when they are not
/// valid UTF-8. A leading UTF-8 byte-order mark is dropped.
pub fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            tracing::warn!(
                valid_up_to = e.valid_up_to(),
                "Source is not valid UTF-8, decoding as Windows-1252"
            );
            let (text, _had_errors) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}

/// Rejects sources whose records disagree with the header on field count.
fn check_structure(path: &Path, text: &str) -> Result<()> {
    let malformed = |line: Option<u64>, reason: String| PrepError::MalformedSource {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let header_len = reader
        .headers()
        .map_err(|e| malformed(e.position().map(csv::Position::line), e.to_string()))?
        .len();
    if header_len == 0 {
        return Err(malformed(None, "no header row".to_owned()));
    }

    for record in reader.records() {
        record.map_err(|e| malformed(e.position().map(csv::Position::line), e.to_string()))?;
    }
    Ok(())
}

/// Checks that every column the pipeline transforms is present. Order is not
/// significant and extra columns pass through untouched.
///
/// # Errors
///
/// [`PrepError::MissingColumns`] naming every absent column.
pub fn require_columns(df: &DataFrame) -> Result<()> {
    let present: HashSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();
    let missing: Vec<String> = columns::required()
        .filter(|name| !present.contains(name))
        .map(str::to_owned)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepError::MissingColumns(missing))
    }
}
