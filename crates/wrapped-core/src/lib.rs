//! Shared building blocks for the viewing-history wrap-up.
//!
//! Holds the domain model (raw and enriched viewing events, reference
//! entries, date ranges), calendar and formatting helpers, the error type
//! and the command-line settings.

pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, WrappedError};
