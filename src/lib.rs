//! # chartprep - preprocessing for music-chart datasets
//!
//! Turns the raw "popular Spotify songs" table into a model-ready one:
//! text fields are tidied, counts coerced to integers, placeholder tokens
//! turned into missing values and filled with column medians, `key` and
//! `mode` one-hot encoded, and `bpm` standardised.
//!
//! ```no_run
//! use chartprep::pipeline::{loader, transform};
//! use std::path::Path;
//!
//! let raw = loader::load_dataset(Path::new("popular_spotify_songs.csv"))?;
//! let out = transform(raw, 5)?;
//! println!("{}", out.df.head(Some(5)));
//! # Ok::<(), chartprep::error::PrepError>(())
//! ```
//!
//! ## Modules
//!
//! - [`pipeline`]: the load → normalize → encode → scale → persist stages
//! - [`config`]: run settings, loadable from JSON
//! - [`error`]: the [`error::PrepError`] taxonomy
//! - [`logging`]: `tracing` subscriber setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
