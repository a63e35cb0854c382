use chrono::{Datelike, NaiveDate};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::calendar::parse_date_arg;
use crate::error::Result;
use crate::models::DateRange;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Year-in-review summary of a viewing-history log
#[derive(Parser, Debug, Clone)]
#[command(
    name = "watch-wrapped",
    about = "Year-in-review summary of a viewing-history log",
    version
)]
pub struct Settings {
    /// Viewing-history CSV with Date, Title and Runtime_min columns
    #[arg(long, env = "WRAPPED_HISTORY", default_value = "NetflixViewingHistory.csv")]
    pub history: PathBuf,

    /// Reference catalog CSV with Title, Media and Genre columns
    #[arg(long, env = "WRAPPED_REFERENCE", default_value = "NetflixShowData.csv")]
    pub reference: PathBuf,

    /// Where the enriched dataset is written
    #[arg(long, env = "WRAPPED_OUTPUT", default_value = "NetflixWrapped.csv")]
    pub output: PathBuf,

    /// Calendar year to summarize (defaults to the previous year)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub year: Option<i32>,

    /// First day of a custom period (inclusive)
    #[arg(long, requires = "to", value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day of a custom period (inclusive)
    #[arg(long, requires = "from", value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    /// Titles are cut at the first occurrence of this character
    #[arg(long, default_value = ":")]
    pub delimiter: char,

    /// Number of entries in the favourite titles and genres (1-50)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=50))]
    pub top: u32,

    /// Report format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Summarize an existing enriched dataset instead of cleaning the inputs
    #[arg(long)]
    pub from_enriched: Option<PathBuf>,

    /// Skip writing the enriched dataset
    #[arg(long)]
    pub no_write: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments; flags fall back to their environment
    /// variables, then to the built-in defaults.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Settings::parse_from(args).apply_debug()
    }

    /// The period to summarize: `--from`/`--to` when both are given,
    /// otherwise `--year`, otherwise the year before `today`.
    pub fn period(&self, today: NaiveDate) -> Result<DateRange> {
        match (self.from, self.to) {
            (Some(start), Some(end)) => DateRange::new(start, end),
            _ => DateRange::calendar_year(self.year.unwrap_or(today.year() - 1)),
        }
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut self) -> Self {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
