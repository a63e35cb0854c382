//! Cleaning and enrichment of raw viewing records.
//!
//! Turns [`ViewingRecord`]s into [`EnrichedEvent`]s in four steps: validate
//! each row, keep only the requested period, cut the title at the delimiter,
//! and left-join the clean title against the reference catalog. Rows that
//! fail validation are dropped and counted in the [`CleanReport`].

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};
use wrapped_core::calendar::parse_date;
use wrapped_core::models::{
    DateRange, EnrichedEvent, ReferenceEntry, ViewingEvent, ViewingRecord,
};

/// Default title delimiter: `"Show: Season 1: Episode 2"` becomes `"Show"`.
pub const DEFAULT_DELIMITER: char = ':';

// ── Title normalisation ───────────────────────────────────────────────────────

/// Everything before the first `delimiter`, or the whole title if there is
/// none.
pub fn clean_title(raw_title: &str, delimiter: char) -> &str {
    raw_title
        .split_once(delimiter)
        .map_or(raw_title, |(head, _)| head)
}

// ── Validation ────────────────────────────────────────────────────────────────

/// Why a viewing record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    InvalidDate,
    MissingTitle,
    MissingRuntime,
    InvalidRuntime,
    NegativeRuntime,
}

/// Per-reason counts of rejected records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MalformedCounts {
    pub invalid_date: usize,
    pub missing_title: usize,
    pub missing_runtime: usize,
    pub invalid_runtime: usize,
    pub negative_runtime: usize,
}

impl MalformedCounts {
    pub fn record(&mut self, reason: MalformedReason) {
        let slot = match reason {
            MalformedReason::InvalidDate => &mut self.invalid_date,
            MalformedReason::MissingTitle => &mut self.missing_title,
            MalformedReason::MissingRuntime => &mut self.missing_runtime,
            MalformedReason::InvalidRuntime => &mut self.invalid_runtime,
            MalformedReason::NegativeRuntime => &mut self.negative_runtime,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.invalid_date
            + self.missing_title
            + self.missing_runtime
            + self.invalid_runtime
            + self.negative_runtime
    }
}

/// Validate one raw record. Checks run in the order date, title, runtime and
/// the first failure is reported.
pub fn validate_record(record: &ViewingRecord) -> Result<ViewingEvent, MalformedReason> {
    let date = parse_date(&record.date).ok_or(MalformedReason::InvalidDate)?;

    if record.title.trim().is_empty() {
        return Err(MalformedReason::MissingTitle);
    }

    let runtime_minutes = parse_runtime(record.runtime_min.as_deref())?;

    Ok(ViewingEvent {
        date,
        raw_title: record.title.clone(),
        runtime_minutes,
    })
}

/// Parse a runtime cell: whole numbers as-is, fractional values rounded to
/// the nearest minute.
fn parse_runtime(raw: Option<&str>) -> Result<u32, MalformedReason> {
    let s = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(MalformedReason::MissingRuntime)?;

    if let Ok(whole) = s.parse::<i64>() {
        if whole < 0 {
            return Err(MalformedReason::NegativeRuntime);
        }
        return u32::try_from(whole).map_err(|_| MalformedReason::InvalidRuntime);
    }

    let value: f64 = s.parse().map_err(|_| MalformedReason::InvalidRuntime)?;
    if !value.is_finite() {
        return Err(MalformedReason::InvalidRuntime);
    }
    if value < 0.0 {
        return Err(MalformedReason::NegativeRuntime);
    }
    let rounded = value.round();
    if rounded > f64::from(u32::MAX) {
        return Err(MalformedReason::InvalidRuntime);
    }
    Ok(rounded as u32)
}

// ── Reference index ───────────────────────────────────────────────────────────

/// Title lookup over the reference catalog.
///
/// When a title appears more than once the first row in file order wins and
/// the title is recorded as ambiguous.
#[derive(Debug)]
pub struct ReferenceIndex<'a> {
    by_title: HashMap<&'a str, &'a ReferenceEntry>,
    ambiguous: Vec<String>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(entries: &'a [ReferenceEntry]) -> Self {
        let mut by_title: HashMap<&'a str, &'a ReferenceEntry> = HashMap::new();
        let mut duplicates: HashMap<&'a str, usize> = HashMap::new();
        let mut ambiguous = Vec::new();

        for entry in entries {
            let title = entry.title.as_str();
            if by_title.contains_key(title) {
                let count = duplicates.entry(title).or_insert(1);
                if *count == 1 {
                    ambiguous.push(title.to_string());
                }
                *count += 1;
            } else {
                by_title.insert(title, entry);
            }
        }

        for title in &ambiguous {
            warn!(
                "Reference catalog has {} rows for '{}'; using the first",
                duplicates.get(title.as_str()).copied().unwrap_or(2),
                title
            );
        }

        Self {
            by_title,
            ambiguous,
        }
    }

    pub fn lookup(&self, title: &str) -> Option<&'a ReferenceEntry> {
        self.by_title.get(title).copied()
    }

    /// Titles with more than one reference row, in first-seen order.
    pub fn ambiguous_titles(&self) -> &[String] {
        &self.ambiguous
    }
}

// ── CleanReport ───────────────────────────────────────────────────────────────

/// Data-quality diagnostics for one cleaning run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Raw records handed to the cleaner.
    pub records_read: usize,
    /// Records rejected by validation, by reason.
    pub malformed: MalformedCounts,
    /// Valid records dated outside the period.
    pub out_of_period: usize,
    /// Events that made it into the enriched dataset.
    pub enriched: usize,
    /// Enriched events without a reference match.
    pub unmatched_events: usize,
    /// Distinct clean titles without a reference match.
    pub unmatched_titles: usize,
    /// Reference titles that appeared on several rows.
    pub ambiguous_titles: Vec<String>,
}

/// Output of [`Cleaner::clean`].
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub events: Vec<EnrichedEvent>,
    pub report: CleanReport,
}

// ── Cleaner ───────────────────────────────────────────────────────────────────

/// Stateless record cleaner; only the title delimiter is configurable.
#[derive(Debug, Clone, Copy)]
pub struct Cleaner {
    delimiter: char,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl Cleaner {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Validate, filter to `period`, and enrich `records` against `reference`.
    ///
    /// Every surviving record yields exactly one event, in input order,
    /// whether or not its title has a reference match.
    pub fn clean(
        &self,
        records: &[ViewingRecord],
        reference: &[ReferenceEntry],
        period: &DateRange,
    ) -> CleanOutput {
        let index = ReferenceIndex::build(reference);
        let mut report = CleanReport {
            records_read: records.len(),
            ambiguous_titles: index.ambiguous_titles().to_vec(),
            ..CleanReport::default()
        };

        let mut events = Vec::with_capacity(records.len());
        let mut unmatched: HashMap<String, usize> = HashMap::new();

        for (row, record) in records.iter().enumerate() {
            let event = match validate_record(record) {
                Ok(event) => event,
                Err(reason) => {
                    debug!("Dropping record {} ({:?}): {:?}", row, reason, record);
                    report.malformed.record(reason);
                    continue;
                }
            };

            if !period.contains(event.date) {
                report.out_of_period += 1;
                continue;
            }

            let title = clean_title(&event.raw_title, self.delimiter).to_string();
            let enriched = match index.lookup(&title) {
                Some(entry) => {
                    EnrichedEvent::new(event, title, entry.media_type, entry.genre.clone())
                }
                None => {
                    *unmatched.entry(title.clone()).or_default() += 1;
                    report.unmatched_events += 1;
                    EnrichedEvent::new(event, title, None, None)
                }
            };
            events.push(enriched);
        }

        report.enriched = events.len();
        report.unmatched_titles = unmatched.len();

        if report.malformed.total() > 0 {
            warn!(
                "Dropped {} malformed viewing records out of {}",
                report.malformed.total(),
                report.records_read
            );
        }
        if report.unmatched_titles > 0 {
            info!(
                "{} titles ({} events) have no reference entry",
                report.unmatched_titles, report.unmatched_events
            );
        }
        info!(
            "Cleaned {} of {} records for {} ({} outside the period)",
            report.enriched, report.records_read, period, report.out_of_period
        );

        CleanOutput { events, report }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
