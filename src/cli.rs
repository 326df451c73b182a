use anyhow::{Context as _, Result};
use chartprep::config::{PrepConfig, load_config};
use chartprep::pipeline::{self, columns, report};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "chartprep",
    about = "Clean, encode and scale the popular Spotify songs dataset"
)]
pub struct Cli {
    /// Source CSV. Defaults to popular_spotify_songs.csv
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output CSV. Defaults to preprocessed_popular_spotify_songs.csv
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a JSON run configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Rows to show in the before/after previews
    #[arg(long)]
    pub preview_rows: Option<usize>,

    /// Also write rotating log files
    #[arg(long)]
    pub log_file: bool,

    /// Directory for log files (implies --log-file)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Only print the summary, not the previews
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Config file values first, then any flags given on the command line.
    pub fn resolve_config(&self) -> Result<PrepConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PrepConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input.clone_from(input);
        }
        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(rows) = self.preview_rows {
            config.preview_rows = rows;
        }
        if self.log_file || self.log_dir.is_some() {
            config.log_to_file = true;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    let log_dir = match (&config.log_dir, config.log_to_file) {
        (Some(dir), true) => Some(dir.clone()),
        (None, true) => Some(chartprep::logging::default_log_dir()?),
        (_, false) => None,
    };
    chartprep::logging::init(log_dir.as_deref())?;

    println!(
        "Preprocessing {0} into {1}...",
        config.input.display(),
        config.output.display()
    );
    let outcome = pipeline::run(&config).context("Preprocessing failed")?;

    if !cli.quiet {
        println!(
            "{}",
            report::preview("Before One-Hot Encoding and Normalization", &outcome.before)
        );
        println!(
            "{}",
            report::preview("After One-Hot Encoding and Normalization", &outcome.after)
        );
    }

    let key_columns = report::related_columns(&outcome.after, &format!("{}_", columns::KEY));
    println!("Columns related to 'key': {key_columns:?}");
    let mode_columns = report::related_columns(&outcome.after, &format!("{}_", columns::MODE));
    println!("Columns related to 'mode': {mode_columns:?}");

    println!("{}", report::summary(&outcome));
    Ok(())
}
