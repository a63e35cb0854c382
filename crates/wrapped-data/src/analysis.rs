//! End-to-end wrap-up pipeline.
//!
//! Loads the viewing history and reference catalog, cleans and enriches the
//! records for one period, optionally persists the enriched dataset and
//! summarizes it, returning a [`PipelineResult`] ready for presentation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use wrapped_core::models::{DateRange, EnrichedEvent};
use wrapped_core::Result;

use crate::cleaner::{CleanReport, Cleaner};
use crate::reader::{load_enriched, load_reference, load_viewing_history};
use crate::summary::{Summarizer, Summary};
use crate::writer::write_enriched;

// ── Public types ──────────────────────────────────────────────────────────────

/// Inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub history: PathBuf,
    pub reference: PathBuf,
    /// Where to write the enriched dataset; `None` skips writing.
    pub output: Option<PathBuf>,
    pub period: DateRange,
    pub delimiter: char,
    pub top_k: usize,
}

/// Row-level data-quality counters collected across the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineDiagnostics {
    /// History rows the CSV layer could not decode.
    pub unreadable_history_rows: usize,
    /// Reference entries loaded.
    pub reference_rows: usize,
    /// Reference rows skipped (undecodable or without a title).
    pub unreadable_reference_rows: usize,
    pub clean: CleanReport,
}

/// Metadata produced alongside the summary.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    pub period: Option<DateRange>,
    pub events_summarized: usize,
    /// Path of the enriched dataset, if one was written.
    pub written_to: Option<PathBuf>,
    pub load_time_seconds: f64,
    pub clean_time_seconds: f64,
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`run_pipeline`].
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    #[serde(skip)]
    pub events: Vec<EnrichedEvent>,
    pub summary: Summary,
    pub diagnostics: PipelineDiagnostics,
    pub metadata: PipelineMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline.
///
/// 1. Load the history and reference files.
/// 2. Clean and enrich the records for `config.period`.
/// 3. Write the enriched dataset when `config.output` is set.
/// 4. Summarize.
///
/// An empty dataset after cleaning is not an error; the summary simply
/// reports nothing watched.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineResult> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = Instant::now();
    let history = load_viewing_history(&config.history)?;
    let reference = load_reference(&config.reference)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Clean ─────────────────────────────────────────────────────────
    let clean_start = Instant::now();
    let cleaned = Cleaner::new(config.delimiter).clean(
        &history.records,
        &reference.records,
        &config.period,
    );
    let clean_time = clean_start.elapsed().as_secs_f64();

    // ── Step 3: Persist ───────────────────────────────────────────────────────
    if let Some(output) = &config.output {
        write_enriched(output, &cleaned.events)?;
    }

    // ── Step 4: Summarize ─────────────────────────────────────────────────────
    let aggregate_start = Instant::now();
    let summary = Summarizer::new(config.top_k).summarize(&cleaned.events);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    if summary.is_empty() {
        warn!(
            "No viewing events left for {} ({} records read)",
            config.period, cleaned.report.records_read
        );
    }

    let diagnostics = PipelineDiagnostics {
        unreadable_history_rows: history.unreadable_rows,
        reference_rows: reference.records.len(),
        unreadable_reference_rows: reference.unreadable_rows,
        clean: cleaned.report,
    };

    let metadata = PipelineMetadata {
        generated_at: Utc::now().to_rfc3339(),
        period: Some(config.period),
        events_summarized: cleaned.events.len(),
        written_to: config.output.clone(),
        load_time_seconds: load_time,
        clean_time_seconds: clean_time,
        aggregate_time_seconds: aggregate_time,
    };

    info!(
        "Summarized {} events in {:.3}s",
        metadata.events_summarized,
        load_time + clean_time + aggregate_time
    );

    Ok(PipelineResult {
        events: cleaned.events,
        summary,
        diagnostics,
        metadata,
    })
}

/// Summarize a previously written enriched dataset.
///
/// With `period` set, events outside it are dropped first and counted as
/// out of period. The file does not record which rows matched the
/// reference catalog (a matched row may still have null metadata), so the
/// unmatched and ambiguity counters of the report stay at zero.
pub fn summarize_enriched(
    path: &Path,
    top_k: usize,
    period: Option<DateRange>,
) -> Result<PipelineResult> {
    let load_start = Instant::now();
    let loaded = load_enriched(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let records_read = loaded.records.len();
    let events: Vec<EnrichedEvent> = match &period {
        Some(range) => loaded
            .records
            .into_iter()
            .filter(|e| range.contains(e.date))
            .collect(),
        None => loaded.records,
    };

    let aggregate_start = Instant::now();
    let summary = Summarizer::new(top_k).summarize(&events);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    if summary.is_empty() {
        warn!("No viewing events in {}", path.display());
    }

    let clean = CleanReport {
        records_read,
        out_of_period: records_read - events.len(),
        enriched: events.len(),
        ..CleanReport::default()
    };

    let diagnostics = PipelineDiagnostics {
        unreadable_history_rows: loaded.unreadable_rows,
        clean,
        ..PipelineDiagnostics::default()
    };

    let metadata = PipelineMetadata {
        generated_at: Utc::now().to_rfc3339(),
        period,
        events_summarized: events.len(),
        written_to: None,
        load_time_seconds: load_time,
        clean_time_seconds: 0.0,
        aggregate_time_seconds: aggregate_time,
    };

    Ok(PipelineResult {
        events,
        summary,
        diagnostics,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wrapped_core::calendar::DayOfWeek;
    use wrapped_core::WrappedError;

    const HISTORY: &str = "Title,Date,Runtime_min\n\
        \"Alpha: Season 1: Pilot\",1/5/20,60\n\
        Beta,2/10/20,120\n\
        Gamma,12/31/19,45\n\
        ,3/1/20,30\n\
        Delta,bad-date,30\n";

    const REFERENCE: &str = "Title,Media,Genre\nAlpha,TV Show,Drama\nGamma,Movie,Comedy\n";

    fn setup(dir: &TempDir) -> PipelineConfig {
        let history = dir.path().join("history.csv");
        let reference = dir.path().join("reference.csv");
        fs::write(&history, HISTORY).unwrap();
        fs::write(&reference, REFERENCE).unwrap();

        PipelineConfig {
            history,
            reference,
            output: Some(dir.path().join("out").join("wrapped.csv")),
            period: DateRange::calendar_year(2020).unwrap(),
            delimiter: ':',
            top_k: 3,
        }
    }

    #[test]
    fn test_run_pipeline_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);

        let result = run_pipeline(&config).unwrap();

        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].clean_title, "Alpha");
        assert_eq!(result.events[0].day_of_week, DayOfWeek::Sunday);

        let summary = &result.summary;
        assert_eq!(summary.totals.total_minutes, 180);
        assert_eq!(summary.totals.total_hours, 3);
        assert_eq!(summary.totals.total_days, 0.12);
        assert_eq!(summary.genre_count, 1);
        assert_eq!(summary.top_titles.len(), 2);
        assert_eq!(summary.catalog.tv_shows, 1);
        assert_eq!(summary.catalog.unknown_media, 1);

        let clean = &result.diagnostics.clean;
        assert_eq!(clean.records_read, 5);
        assert_eq!(clean.out_of_period, 1);
        assert_eq!(clean.malformed.missing_title, 1);
        assert_eq!(clean.malformed.invalid_date, 1);
        assert_eq!(clean.unmatched_titles, 1);
        assert_eq!(result.diagnostics.reference_rows, 2);

        assert_eq!(result.metadata.events_summarized, 2);
        assert!(config.output.as_ref().unwrap().exists());
    }

    #[test]
    fn test_run_pipeline_without_output_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.output = None;

        let result = run_pipeline(&config).unwrap();
        assert!(result.metadata.written_to.is_none());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_run_pipeline_empty_period() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.period = DateRange::calendar_year(2015).unwrap();

        let result = run_pipeline(&config).unwrap();
        assert!(result.summary.is_empty());
        assert_eq!(result.summary.peak_month, None);
        assert_eq!(result.diagnostics.clean.out_of_period, 3);
    }

    #[test]
    fn test_run_pipeline_missing_history_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.history = dir.path().join("missing.csv");

        assert!(matches!(
            run_pipeline(&config).unwrap_err(),
            WrappedError::FileRead { .. }
        ));
    }

    #[test]
    fn test_summarize_enriched_matches_pipeline() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);
        let first = run_pipeline(&config).unwrap();

        let output = config.output.as_ref().unwrap();
        let second = summarize_enriched(output, 3, None).unwrap();

        assert_eq!(second.events, first.events);
        assert_eq!(second.summary.totals, first.summary.totals);
        assert_eq!(second.summary.monthly, first.summary.monthly);
        assert_eq!(second.summary.title_ranking, first.summary.title_ranking);
    }

    #[test]
    fn test_summarize_enriched_leaves_join_counters_at_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wrapped.csv");
        // Alpha matched with an unparsed media label; Beta never matched.
        fs::write(
            &path,
            "Date,RawTitle,Runtime_min,Month,DayOfWeek,Title,Media,Genre\n\
             2020-01-05,Alpha,60,1,Sunday,Alpha,Podcast,Drama\n\
             2020-02-10,Beta,120,2,Monday,Beta,,\n",
        )
        .unwrap();

        let result = summarize_enriched(&path, 3, None).unwrap();
        let clean = &result.diagnostics.clean;

        assert_eq!(clean.enriched, 2);
        assert_eq!(clean.unmatched_events, 0);
        assert_eq!(clean.unmatched_titles, 0);
        assert!(clean.ambiguous_titles.is_empty());
        assert_eq!(result.summary.catalog.unknown_media, 2);
    }

    #[test]
    fn test_summarize_enriched_filters_period() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);
        run_pipeline(&config).unwrap();

        let january = DateRange::new(
            chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
        )
        .unwrap();
        let result =
            summarize_enriched(config.output.as_ref().unwrap(), 3, Some(january)).unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.diagnostics.clean.out_of_period, 1);
        assert_eq!(result.summary.peak_month, Some(1));
    }
}
