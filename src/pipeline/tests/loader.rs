use crate::error::PrepError;
use crate::pipeline::loader::*;
use anyhow::Result;
use polars::prelude::*;
use std::path::{Path, PathBuf};

fn temp_csv(name: &str, content: &[u8]) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("chartprep_loader_{name}.csv"));
    std::fs::write(&path, content)?;
    Ok(path)
}

#[test]
fn test_decode_utf8_strips_bom() {
    assert_eq!(decode_source(b"\xEF\xBB\xBFa,b\n"), "a,b\n");
    assert_eq!(decode_source("Beyonc\u{e9}".as_bytes()), "Beyonc\u{e9}");
}

#[test]
fn test_decode_falls_back_to_windows_1252() {
    // 0xE9 is é and 0x92 a right single quote in Windows-1252
    assert_eq!(decode_source(b"Beyonc\xE9"), "Beyonc\u{e9}");
    assert_eq!(decode_source(b"don\x92t"), "don\u{2019}t");
}

#[test]
fn test_load_infers_types() -> Result<()> {
    let path = temp_csv(
        "infer",
        b"track_name,streams,bpm\n\"Seven, Live\",141381703,125\nLALA,BPM110,92\n",
    )?;
    let df = load_dataset(&path);
    let _ = std::fs::remove_file(&path);
    let df = df?;

    assert_eq!(df.shape(), (2, 3));
    assert_eq!(df.column("bpm")?.dtype(), &DataType::Int64);
    assert_eq!(df.column("streams")?.dtype(), &DataType::String);
    let names = df.column("track_name")?.as_materialized_series().str()?.clone();
    assert_eq!(names.get(0), Some("Seven, Live"));
    Ok(())
}

#[test]
fn test_missing_source() {
    let err = load_dataset(Path::new("definitely/not/here.csv")).unwrap_err();
    assert!(matches!(err, PrepError::SourceNotFound(_)), "{err}");
}

#[test]
fn test_ragged_rows_are_malformed() -> Result<()> {
    let path = temp_csv("ragged", b"a,b,c\n1,2,3\n4,5\n")?;
    let result = load_dataset(&path);
    let _ = std::fs::remove_file(&path);

    match result {
        Err(PrepError::MalformedSource { line, .. }) => assert_eq!(line, Some(3)),
        other => panic!("expected MalformedSource, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_empty_source_is_malformed() -> Result<()> {
    let path = temp_csv("empty", b"")?;
    let result = load_dataset(&path);
    let _ = std::fs::remove_file(&path);

    assert!(matches!(result, Err(PrepError::MalformedSource { .. })));
    Ok(())
}

#[test]
fn test_require_columns_lists_every_gap() -> Result<()> {
    let df = super::sample_frame()?.drop_many(["key", "bpm"]);

    match require_columns(&df) {
        Err(PrepError::MissingColumns(missing)) => {
            assert_eq!(missing, vec!["bpm".to_owned(), "key".to_owned()]);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert!(require_columns(&super::sample_frame()?).is_ok());
    Ok(())
}
