//! CSV loading for the viewing history, the reference catalog and a
//! previously written enriched dataset.
//!
//! Missing files and missing required columns are fatal. Individual rows the
//! CSV layer cannot decode are skipped and counted so the caller can see how
//! much of the file was usable.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use wrapped_core::models::{EnrichedEvent, MediaType, ReferenceEntry, ViewingRecord};
use wrapped_core::{Result, WrappedError};

use crate::writer::EnrichedRow;

// ── Public types ──────────────────────────────────────────────────────────────

/// Records decoded from one file plus the number of rows that were skipped.
#[derive(Debug, Clone)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub unreadable_rows: usize,
}

impl<T> LoadOutcome<T> {
    /// Total data rows encountered, decoded or not.
    pub fn rows_seen(&self) -> usize {
        self.records.len() + self.unreadable_rows
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load raw viewing records. Requires `Date`, `Title` and `Runtime_min`.
pub fn load_viewing_history(path: &Path) -> Result<LoadOutcome<ViewingRecord>> {
    let outcome = read_csv::<ViewingRecord>(path, &[&["Date"], &["Title"], &["Runtime_min"]])?;
    debug!(
        "Loaded {} viewing records from {} ({} unreadable)",
        outcome.records.len(),
        path.display(),
        outcome.unreadable_rows
    );
    Ok(outcome)
}

/// Load the reference catalog. Requires `Title`; media and genre columns
/// are optional and default to null when absent.
pub fn load_reference(path: &Path) -> Result<LoadOutcome<ReferenceEntry>> {
    let raw = read_csv::<ReferenceRecord>(path, &[&["Title"]])?;

    let mut unreadable_rows = raw.unreadable_rows;
    let mut unknown_media = 0usize;
    let mut records = Vec::with_capacity(raw.records.len());

    for record in raw.records {
        if record.title.is_empty() {
            unreadable_rows += 1;
            continue;
        }
        let media_label = non_empty(record.media);
        let media_type = media_label.as_deref().and_then(MediaType::parse);
        if media_type.is_none() {
            if let Some(label) = &media_label {
                debug!("Unrecognised media type '{}' for '{}'", label, record.title);
                unknown_media += 1;
            }
        }
        records.push(ReferenceEntry {
            title: record.title,
            media_type,
            genre: non_empty(record.genre),
        });
    }

    if unknown_media > 0 {
        warn!(
            "{} reference rows in {} have an unrecognised media type",
            unknown_media,
            path.display()
        );
    }

    Ok(LoadOutcome {
        records,
        unreadable_rows,
    })
}

/// Load an enriched dataset previously produced by
/// [`write_enriched`](crate::writer::write_enriched).
///
/// Month and day of week are re-derived from `Date` rather than trusted.
pub fn load_enriched(path: &Path) -> Result<LoadOutcome<EnrichedEvent>> {
    let raw = read_csv::<EnrichedRow>(
        path,
        &[&["Date"], &["RawTitle"], &["Runtime_min"], &["Title"]],
    )?;

    let mut unreadable_rows = raw.unreadable_rows;
    let mut records = Vec::with_capacity(raw.records.len());
    for row in raw.records {
        match row.into_event() {
            Some(event) => records.push(event),
            None => unreadable_rows += 1,
        }
    }

    Ok(LoadOutcome {
        records,
        unreadable_rows,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Raw reference row; metadata columns accept a few common spellings.
#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Media", alias = "Type", alias = "media_type", default)]
    media: Option<String>,
    #[serde(rename = "Genre", alias = "genre", default)]
    genre: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode every row of a headered CSV file into `T`.
///
/// `required` lists the columns that must be present; each entry holds the
/// accepted spellings of one column.
fn read_csv<T: DeserializeOwned>(path: &Path, required: &[&[&str]]) -> Result<LoadOutcome<T>> {
    let file = File::open(path).map_err(|source| WrappedError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    check_required_columns(path, &headers, required)?;

    let mut records = Vec::new();
    let mut unreadable_rows = 0usize;

    for (idx, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                // Header is line 1, so data row `idx` sits on line idx + 2.
                debug!("Skipping line {} of {}: {}", idx + 2, path.display(), e);
                unreadable_rows += 1;
            }
        }
    }

    Ok(LoadOutcome {
        records,
        unreadable_rows,
    })
}

fn check_required_columns(path: &Path, headers: &StringRecord, required: &[&[&str]]) -> Result<()> {
    for spellings in required {
        let present = headers.iter().any(|h| spellings.contains(&h));
        if !present {
            return Err(WrappedError::MissingColumn {
                path: path.to_path_buf(),
                column: spellings[0].to_string(),
            });
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
