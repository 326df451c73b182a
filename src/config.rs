use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "popular_spotify_songs.csv";
pub const DEFAULT_OUTPUT: &str = "preprocessed_popular_spotify_songs.csv";

/// Run settings. Which columns get transformed is fixed and not part of
/// the configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PrepConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Rows shown in the before/after previews (default: 5)
    pub preview_rows: usize,
    /// Also write rotating log files
    pub log_to_file: bool,
    /// Log directory; the platform data directory when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            preview_rows: 5,
            log_to_file: false,
            log_dir: None,
        }
    }
}

impl PrepConfig {
    /// # Errors
    ///
    /// [`PrepError::Config`] if the output would overwrite the input.
    pub fn validate(&self) -> Result<()> {
        if self.input == self.output {
            return Err(PrepError::Config(format!(
                "output path {} is the same as the input",
                self.output.display()
            )));
        }
        Ok(())
    }
}

/// Reads a JSON config file. Missing fields take their defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_config(path: &Path) -> Result<PrepConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = serde_json::from_str(&content)?;
    Ok(config)
}
