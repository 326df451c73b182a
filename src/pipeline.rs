//! The preprocessing pipeline: load → normalize → encode → scale → persist.
//!
//! Each stage takes the frame by value and hands back the transformed frame,
//! so only one stage ever holds the data at a time. Any error aborts the run
//! before the output file is touched.
//!
//! ```no_run
//! use chartprep::config::PrepConfig;
//! use chartprep::pipeline;
//!
//! let outcome = pipeline::run(&PrepConfig::default())?;
//! println!("wrote {} rows", outcome.output_shape.0);
//! # Ok::<(), chartprep::error::PrepError>(())
//! ```

pub mod columns;
pub mod encoder;
pub mod loader;
pub mod normalizer;
pub mod persist;
pub mod report;
pub mod scaler;


use crate::config::PrepConfig;
use crate::error::Result;
use encoder::EncodedColumn;
use normalizer::NormalizeReport;
use polars::prelude::DataFrame;
use scaler::ScaleStats;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    Encode,
    Scale,
    Persist,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Normalize => "normalize",
            Self::Encode => "encode",
            Self::Scale => "scale",
            Self::Persist => "persist",
        }
    }

    /// The stage that runs after this one, `None` after the last.
    pub fn next_stage(&self) -> Option<Self> {
        match self {
            Self::Load => Some(Self::Normalize),
            Self::Normalize => Some(Self::Encode),
            Self::Encode => Some(Self::Scale),
            Self::Scale => Some(Self::Persist),
            Self::Persist => None,
        }
    }

    /// Enters a tracing span tagged with this stage for the caller's scope.
    fn enter(self) -> tracing::span::EnteredSpan {
        tracing::info_span!("stage", stage = self.as_str()).entered()
    }
}

/// Result of the in-memory part of the pipeline.
#[derive(Debug)]
pub struct Transformed {
    pub df: DataFrame,
    /// First rows after normalization, before encoding and scaling
    pub before: DataFrame,
    pub normalize: NormalizeReport,
    pub encoded: Vec<EncodedColumn>,
    pub scale: ScaleStats,
}

/// Everything a completed run reports back.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// (rows, columns) as loaded
    pub input_shape: (usize, usize),
    /// (rows, columns) as written
    pub output_shape: (usize, usize),
    pub before: DataFrame,
    /// First rows of the written frame
    pub after: DataFrame,
    pub normalize: NormalizeReport,
    pub encoded: Vec<EncodedColumn>,
    pub scale: ScaleStats,
    pub output_path: PathBuf,
    pub duration: Duration,
}

/// Runs the whole pipeline from `config.input` to `config.output`.
///
/// # Errors
///
/// Returns the first error raised by any stage; nothing is written unless
/// every stage succeeds.
pub fn run(config: &PrepConfig) -> Result<PipelineOutcome> {
    config.validate()?;
    let started = Instant::now();

    let df = {
        let _stage = Stage::Load.enter();
        let df = loader::load_dataset(&config.input)?;
        loader::require_columns(&df)?;
        df
    };
    let input_shape = df.shape();

    let Transformed {
        mut df,
        before,
        normalize,
        encoded,
        scale,
    } = transform(df, config.preview_rows)?;

    {
        let _stage = Stage::Persist.enter();
        persist::save_dataset(&mut df, &config.output)?;
    }

    let duration = started.elapsed();
    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        elapsed_ms = duration.as_millis() as u64,
        "Pipeline finished"
    );

    Ok(PipelineOutcome {
        input_shape,
        output_shape: df.shape(),
        before,
        after: df.head(Some(config.preview_rows)),
        normalize,
        encoded,
        scale,
        output_path: config.output.clone(),
        duration,
    })
}

/// Normalizes, one-hot encodes `key`/`mode` and standardises `bpm`.
///
/// # Errors
///
/// Returns the first stage error; see [`normalizer::normalize`],
/// [`encoder::one_hot_encode`] and [`scaler::standardize`].
pub fn transform(df: DataFrame, preview_rows: usize) -> Result<Transformed> {
    let (df, normalize) = {
        let _stage = Stage::Normalize.enter();
        normalizer::normalize(df)?
    };
    let before = df.head(Some(preview_rows));

    let (df, encoded) = {
        let _stage = Stage::Encode.enter();
        encoder::one_hot_encode(df, &columns::CATEGORICAL)?
    };

    let (df, scale) = {
        let _stage = Stage::Scale.enter();
        scaler::standardize(df, columns::BPM, columns::BPM_NORMALIZED)?
    };

    Ok(Transformed {
        df,
        before,
        normalize,
        encoded,
        scale,
    })
}
