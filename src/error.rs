//! Error types for the preprocessing pipeline.
//!
//! Every stage returns [`Result`], and any error aborts the run. Variants carry
//! the column (and row, where one is known) so a failed run can be traced back
//! to the offending cell:
//!
//! ```
//! use chartprep::error::PrepError;
//!
//! fn explain(err: &PrepError) -> &'static str {
//!     match err {
//!         PrepError::SourceNotFound(_) | PrepError::MalformedSource { .. } => "bad input file",
//!         PrepError::TypeCoercion { .. } => "unparseable value in a strict column",
//!         PrepError::DegenerateScale { .. } => "cannot standardise a constant column",
//!         _ => "pipeline failure",
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any result whose error converts
//! into [`PrepError`].

use std::fmt;
use std::path::PathBuf;

/// Main error type for pipeline operations.
#[derive(Debug)]
pub enum PrepError {
    /// The source path does not resolve to a readable file.
    SourceNotFound(PathBuf),

    /// The source is not a well-formed delimited table.
    MalformedSource {
        path: PathBuf,
        /// 1-based line in the source, when known
        line: Option<u64>,
        reason: String,
    },

    /// Required columns are absent from the source header.
    MissingColumns(Vec<String>),

    /// A cell in a strict column could not be coerced to the target type.
    TypeCoercion {
        column: String,
        /// 0-based data row
        row: usize,
        value: String,
        target: &'static str,
    },

    /// A categorical column could not be one-hot encoded.
    Encoding {
        column: String,
        row: Option<usize>,
        reason: String,
    },

    /// The scale target has zero (or undefined) spread.
    DegenerateScale { column: String, std_dev: f64 },

    /// I/O errors (reading the source, writing the output)
    Io(std::io::Error),

    /// Polars errors not covered by a more specific variant
    DataProcessing(String),

    /// Configuration file errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotFound(path) => write!(f, "Source not found: {}", path.display()),
            Self::MalformedSource { path, line, reason } => match line {
                Some(line) => write!(
                    f,
                    "Malformed source {} at line {line}: {reason}",
                    path.display()
                ),
                None => write!(f, "Malformed source {}: {reason}", path.display()),
            },
            Self::MissingColumns(columns) => {
                write!(f, "Missing required columns: {}", columns.join(", "))
            }
            Self::TypeCoercion {
                column,
                row,
                value,
                target,
            } => write!(
                f,
                "Cannot coerce {value:?} to {target} in column '{column}' at row {row}"
            ),
            Self::Encoding {
                column,
                row: Some(row),
                reason,
            } => write!(f, "Cannot encode column '{column}' at row {row}: {reason}"),
            Self::Encoding {
                column,
                row: None,
                reason,
            } => write!(f, "Cannot encode column '{column}': {reason}"),
            Self::DegenerateScale { column, std_dev } => write!(
                f,
                "Cannot standardise column '{column}': standard deviation is {std_dev}"
            ),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PrepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PrepError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {}", f(), err))
        })
    }
}
