//! # chartprep entry point
//!
//! Runs the preprocessing pipeline once with the paths given on the command
//! line (or the defaults) and prints a short report:
//!
//! ```bash
//! chartprep
//! chartprep --input songs.csv --output songs_clean.csv --quiet
//! ```
//!
//! Set `RUST_LOG=debug` to see per-stage detail on stderr.

#![expect(clippy::print_stdout)] // The run report goes to stdout

mod cli;

use clap::Parser as _;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    cli::run(&cli)
}
