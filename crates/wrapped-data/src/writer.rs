//! Persistence of the enriched dataset.
//!
//! Column layout: `Date, RawTitle, Runtime_min, Month, DayOfWeek, Title,
//! Media, Genre`, where `Title` is the clean title.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use wrapped_core::calendar::parse_date;
use wrapped_core::models::{EnrichedEvent, MediaType, ViewingEvent};
use wrapped_core::{Result, WrappedError};

/// Header of the enriched CSV, in column order.
pub const COLUMNS: [&str; 8] = [
    "Date",
    "RawTitle",
    "Runtime_min",
    "Month",
    "DayOfWeek",
    "Title",
    "Media",
    "Genre",
];

/// One row of the enriched CSV. Field order matches [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "RawTitle")]
    pub raw_title: String,
    #[serde(rename = "Runtime_min")]
    pub runtime_min: u32,
    #[serde(rename = "Month", default)]
    pub month: u32,
    #[serde(rename = "DayOfWeek", default)]
    pub day_of_week: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Media", default)]
    pub media: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
}

impl From<&EnrichedEvent> for EnrichedRow {
    fn from(event: &EnrichedEvent) -> Self {
        Self {
            date: event.date.format("%Y-%m-%d").to_string(),
            raw_title: event.raw_title.clone(),
            runtime_min: event.runtime_minutes,
            month: event.month,
            day_of_week: event.day_of_week.name().to_string(),
            title: event.clean_title.clone(),
            media: event.media_type.map(|m| m.label().to_string()),
            genre: event.genre.clone(),
        }
    }
}

impl EnrichedRow {
    /// Rebuild the event; `None` when the date no longer parses.
    pub fn into_event(self) -> Option<EnrichedEvent> {
        let date = parse_date(&self.date)?;
        let event = ViewingEvent {
            date,
            raw_title: self.raw_title,
            runtime_minutes: self.runtime_min,
        };
        Some(EnrichedEvent::new(
            event,
            self.title,
            self.media.as_deref().and_then(MediaType::parse),
            self.genre.filter(|g| !g.trim().is_empty()),
        ))
    }
}

/// Write `events` to `path` as CSV.
///
/// The file is written to a sibling temp file first and renamed into place,
/// so a failed run never leaves a truncated dataset behind.
pub fn write_enriched(path: &Path, events: &[EnrichedEvent]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| WrappedError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = path.with_extension("csv.tmp");
    let file = File::create(&tmp).map_err(|source| WrappedError::FileWrite {
        path: tmp.clone(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    writer.write_record(COLUMNS)?;
    for event in events {
        writer.serialize(EnrichedRow::from(event))?;
    }
    writer.flush().map_err(|source| WrappedError::FileWrite {
        path: tmp.clone(),
        source,
    })?;
    drop(writer);

    std::fs::rename(&tmp, path).map_err(|source| WrappedError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} enriched events to {}", events.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::load_enriched;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use wrapped_core::calendar::DayOfWeek;

    fn event(date: (i32, u32, u32), raw: &str, clean: &str, minutes: u32) -> EnrichedEvent {
        EnrichedEvent::new(
            ViewingEvent {
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
                raw_title: raw.to_string(),
                runtime_minutes: minutes,
            },
            clean.to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_row_from_event_columns() {
        let mut e = event((2020, 1, 5), "Alpha: Pilot", "Alpha", 60);
        e.media_type = Some(MediaType::TvShow);
        e.genre = Some("Drama".to_string());

        let row = EnrichedRow::from(&e);
        assert_eq!(row.date, "2020-01-05");
        assert_eq!(row.raw_title, "Alpha: Pilot");
        assert_eq!(row.month, 1);
        assert_eq!(row.day_of_week, "Sunday");
        assert_eq!(row.title, "Alpha");
        assert_eq!(row.media.as_deref(), Some("TV Show"));
        assert_eq!(row.genre.as_deref(), Some("Drama"));
    }

    #[test]
    fn test_write_enriched_header_and_null_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("wrapped.csv");
        let events = vec![event((2020, 2, 10), "Beta", "Beta", 120)];

        write_enriched(&path, &events).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("Date,RawTitle,Runtime_min,Month,DayOfWeek,Title,Media,Genre")
        );
        assert_eq!(lines.next(), Some("2020-02-10,Beta,120,2,Monday,Beta,,"));
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_written_dataset_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wrapped.csv");
        let mut with_meta = event((2020, 3, 7), "Gamma: Finale, Part 2", "Gamma", 45);
        with_meta.media_type = Some(MediaType::Movie);
        with_meta.genre = Some("Comedy".to_string());
        let events = vec![with_meta, event((2020, 12, 31), "Delta", "Delta", 0)];

        write_enriched(&path, &events).unwrap();
        let loaded = load_enriched(&path).unwrap();

        assert_eq!(loaded.unreadable_rows, 0);
        assert_eq!(loaded.records, events);
        assert_eq!(loaded.records[1].day_of_week, DayOfWeek::Thursday);
    }

    #[test]
    fn test_write_enriched_empty_dataset_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wrapped.csv");

        write_enriched(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), COLUMNS.join(","));
        assert!(load_enriched(&path).unwrap().records.is_empty());
    }
}
