use std::path::PathBuf;
use thiserror::Error;

use chrono::NaiveDate;

/// All fatal errors produced by the wrapped pipeline.
///
/// Data-quality problems inside otherwise readable files are not errors;
/// they are counted and reported through the cleaning diagnostics.
#[derive(Error, Debug)]
pub enum WrappedError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be created or written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer failed outside of a single recoverable row.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A headered CSV file lacks a column the pipeline cannot work without.
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// The requested period ends before it starts.
    #[error("Invalid period: {start} is after {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    /// A date string did not match any recognised format.
    #[error("Invalid date: {0}")]
    DateParse(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the wrapped crates.
pub type Result<T> = std::result::Result<T, WrappedError>;
