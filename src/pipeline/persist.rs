//! Writes the finished frame to CSV.

use crate::error::{Result, ResultExt as _};
use polars::prelude::*;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Writes `df` as CSV with a header row and no index column.
///
/// Data goes to a sibling `.partial` file that is renamed over `path` once
/// complete, so a failed write leaves any previous output untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be created, written or renamed.
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let staging = staging_path(path);

    if let Err(e) = write_csv(df, &staging) {
        let _ = std::fs::remove_file(&staging);
        return Err(e);
    }
    if let Err(e) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(e).with_context(|| {
            format!("Failed to move output into place at {}", path.display())
        });
    }

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Wrote output"
    );
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context("Failed to write CSV")?;
    file.sync_all()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".partial");
    path.with_file_name(name)
}
