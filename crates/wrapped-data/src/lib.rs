//! Data layer for the viewing-history wrap-up.
//!
//! Reads the viewing history and reference catalog from CSV, cleans and
//! enriches the records, persists the enriched dataset, aggregates the
//! year-in-review views and runs the top-level pipeline.

pub mod aggregator;
pub mod analysis;
pub mod cleaner;
pub mod reader;
pub mod summary;
pub mod writer;

pub use wrapped_core as core;
