use super::sample_frame;
use crate::error::PrepError;
use crate::pipeline::normalizer::*;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_artist_comma_spacing_then_title_case() {
    assert_eq!(title_case(&space_commas("Bob,Alice")), "Bob, Alice");
    assert_eq!(title_case(&space_commas("bob,alice")), "Bob, Alice");
    assert_eq!(title_case(&space_commas("bad bunny,  JHAYCO")), "Bad Bunny, Jhayco");
}

#[test]
fn test_space_commas_is_idempotent() {
    let once = space_commas("a,b,c");
    assert_eq!(once, "a, b, c");
    assert_eq!(space_commas(&once), once);
}

#[test]
fn test_title_case_follows_letter_boundaries() {
    assert_eq!(title_case("the weeknd"), "The Weeknd");
    assert_eq!(title_case("21 savage"), "21 Savage");
    assert_eq!(title_case("mc o'NEIL"), "Mc O'Neil");
}

#[test]
fn test_capitalize() {
    assert_eq!(capitalize("mINOR"), "Minor");
    assert_eq!(capitalize("major"), "Major");
    assert_eq!(capitalize(""), "");
}

#[test]
fn test_number_parsers() {
    assert_eq!(parse_strict_int(" 2023 "), Some(2023));
    assert_eq!(parse_strict_int("2023.0"), None);
    assert_eq!(parse_strict_int("soon"), None);

    assert_eq!(parse_strict_float("92.5"), Some(92.5));
    assert_eq!(parse_strict_float("inf"), None);

    assert_eq!(parse_lenient_float("1,021"), None);
    assert_eq!(parse_lenient_float("BPM110KeyAModeMajor"), None);
    assert_eq!(parse_lenient_float("141381703"), Some(141_381_703.0));
}

#[test]
fn test_normalize_cleans_text_and_categories() -> Result<()> {
    let (df, report) = normalize(sample_frame()?)?;

    let tracks = df.column("track_name")?.as_materialized_series().str()?.clone();
    assert_eq!(tracks.get(0), Some("Seven"));
    assert_eq!(tracks.get(2), Some("vampire"));

    let artists = df
        .column("artist(s)_name")?
        .as_materialized_series()
        .str()?
        .clone();
    assert_eq!(artists.get(0), Some("Latto, Jung Kook"));
    assert_eq!(artists.get(2), Some("Olivia Rodrigo"));

    let keys = df.column("key")?.as_materialized_series().str()?.clone();
    assert_eq!(keys.get(2), Some("F"));
    let modes = df.column("mode")?.as_materialized_series().str()?.clone();
    assert_eq!(modes.get(1), Some("Major"));
    assert_eq!(modes.get(2), Some("Minor"));

    assert!(report.unknown_categories.is_empty());
    Ok(())
}

#[test]
fn test_normalize_coerces_types() -> Result<()> {
    let (df, _) = normalize(sample_frame()?)?;

    assert_eq!(df.column("released_year")?.dtype(), &DataType::Int64);
    assert_eq!(df.column("in_spotify_charts")?.dtype(), &DataType::Int64);
    assert_eq!(df.column("bpm")?.dtype(), &DataType::Float64);
    for name in ["streams", "in_deezer_playlists", "in_shazam_charts"] {
        assert_eq!(df.column(name)?.dtype(), &DataType::Float64, "{name}");
    }
    Ok(())
}

#[test]
fn test_placeholder_tokens_become_medians() -> Result<()> {
    let (df, report) = normalize(sample_frame()?)?;

    // streams row 1 was a junk token; median of the other two
    let streams = df.column("streams")?.as_materialized_series().f64()?.clone();
    assert_eq!(streams.null_count(), 0);
    assert_eq!(streams.get(1), Some((141_381_703.0 + 140_003_974.0) / 2.0));

    // "1,021" is not a number
    let deezer = df
        .column("in_deezer_playlists")?
        .as_materialized_series()
        .f64()?
        .clone();
    assert_eq!(deezer.get(2), Some(51.5));

    let acoustic = df
        .column("acousticness_%")?
        .as_materialized_series()
        .f64()?
        .clone();
    assert_eq!(acoustic.get(1), Some(24.0));

    let imputed: Vec<&str> = report.imputed.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(
        imputed,
        vec!["streams", "in_deezer_playlists", "in_shazam_charts", "acousticness_%"]
    );
    assert!(report.imputed.iter().all(|c| c.filled == 1));
    Ok(())
}

#[test]
fn test_strict_integer_rejects_text() -> Result<()> {
    let mut df = sample_frame()?;
    df.with_column(Series::new(
        "released_year".into(),
        vec!["2023", "2023", "next year"],
    ))?;

    match normalize(df) {
        Err(PrepError::TypeCoercion {
            column, row, value, ..
        }) => {
            assert_eq!(column, "released_year");
            assert_eq!(row, 2);
            assert_eq!(value, "next year");
        }
        other => panic!("expected TypeCoercion, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_strict_integer_rejects_missing() -> Result<()> {
    let mut df = sample_frame()?;
    df.with_column(Series::new(
        "in_apple_charts".into(),
        vec![Some(1i64), None, Some(3)],
    ))?;

    let err = normalize(df).unwrap_err();
    assert!(
        matches!(&err, PrepError::TypeCoercion { column, row: 1, .. } if column == "in_apple_charts"),
        "{err}"
    );
    Ok(())
}

#[test]
fn test_strict_bpm_rejects_text() -> Result<()> {
    let mut df = sample_frame()?;
    df.with_column(Series::new("bpm".into(), vec!["120", "fast", "98.5"]))?;

    let err = normalize(df).unwrap_err();
    assert!(
        matches!(&err, PrepError::TypeCoercion { column, target: "float", .. } if column == "bpm"),
        "{err}"
    );
    Ok(())
}

#[test]
fn test_missing_categories_get_sentinel() -> Result<()> {
    let mut df = sample_frame()?;
    df.with_column(Series::new("key".into(), vec![Some("A"), None, Some("A")]))?;
    df.with_column(Series::new(
        "mode".into(),
        vec![None::<&str>, Some("Minor"), Some("Major")],
    ))?;

    let (df, report) = normalize(df)?;

    let keys = df.column("key")?.as_materialized_series().str()?.clone();
    assert_eq!(keys.get(1), Some("UNKNOWN"));
    let modes = df.column("mode")?.as_materialized_series().str()?.clone();
    assert_eq!(modes.get(0), Some("Unknown"));
    assert_eq!(report.unknown_categories.get("key"), Some(&1));
    assert_eq!(report.unknown_categories.get("mode"), Some(&1));
    Ok(())
}

#[test]
fn test_impute_medians_is_idempotent() -> Result<()> {
    let df = df!(
        "a" => &[Some(1.0), None, Some(3.0), Some(10.0)],
        "b" => &[Some(4i64), Some(2), None, None],
        "c" => &[1i64, 2, 3, 4],
        "label" => &["x", "y", "z", "w"]
    )?;

    let (once, imputed) = impute_medians(df)?;
    assert_eq!(imputed.len(), 2);

    let a = once.column("a")?.as_materialized_series().f64()?.clone();
    assert_eq!(a.get(1), Some(3.0));
    let b = once.column("b")?.as_materialized_series().f64()?.clone();
    assert_eq!(b.get(2), Some(3.0));
    assert_eq!(b.get(3), Some(3.0));
    assert_eq!(once.column("c")?.dtype(), &DataType::Int64);

    let (twice, imputed_again) = impute_medians(once.clone())?;
    assert!(imputed_again.is_empty());
    assert!(twice.equals_missing(&once));
    Ok(())
}

#[test]
fn test_impute_treats_nan_as_missing() -> Result<()> {
    let df = df!("score" => &[1.0, f64::NAN, 5.0])?;

    let (df, imputed) = impute_medians(df)?;
    let score = df.column("score")?.as_materialized_series().f64()?.clone();
    assert_eq!(score.get(1), Some(3.0));
    assert_eq!(imputed[0].filled, 1);
    Ok(())
}
