use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::DayOfWeek;
use crate::error::{Result, WrappedError};

/// Kind of catalog item a title refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl MediaType {
    /// Leniently parse a media label from a reference file.
    ///
    /// Case, spaces, `-` and `_` are ignored. Returns `None` for anything
    /// that is not recognisably a movie or a show.
    pub fn parse(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "movie" | "film" => Some(MediaType::Movie),
            "tvshow" | "tv" | "series" | "tvseries" | "show" => Some(MediaType::TvShow),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One raw row of the viewing-history file, before validation.
///
/// Every field is kept as text so that a bad cell never rejects the row at
/// the CSV layer; validation happens in the cleaner where it can be counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingRecord {
    #[serde(rename = "Date", default)]
    pub date: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Runtime_min", default)]
    pub runtime_min: Option<String>,
}

impl ViewingRecord {
    pub fn new(date: &str, title: &str, runtime_min: Option<&str>) -> Self {
        Self {
            date: date.to_string(),
            title: title.to_string(),
            runtime_min: runtime_min.map(str::to_string),
        }
    }
}

/// A validated viewing event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingEvent {
    pub date: NaiveDate,
    pub raw_title: String,
    pub runtime_minutes: u32,
}

/// Metadata row from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub title: String,
    pub media_type: Option<MediaType>,
    pub genre: Option<String>,
}

/// A viewing event joined with reference metadata and calendar features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub date: NaiveDate,
    pub raw_title: String,
    pub runtime_minutes: u32,
    /// Calendar month, 1–12.
    pub month: u32,
    pub day_of_week: DayOfWeek,
    /// Title with everything from the first delimiter onwards removed.
    pub clean_title: String,
    pub media_type: Option<MediaType>,
    pub genre: Option<String>,
}

impl EnrichedEvent {
    /// Build an enriched event, deriving month and day of week from the date.
    pub fn new(
        event: ViewingEvent,
        clean_title: String,
        media_type: Option<MediaType>,
        genre: Option<String>,
    ) -> Self {
        Self {
            month: event.date.month(),
            day_of_week: DayOfWeek::of(event.date),
            date: event.date,
            raw_title: event.raw_title,
            runtime_minutes: event.runtime_minutes,
            clean_title,
            media_type,
            genre,
        }
    }
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range; fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(WrappedError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn calendar_year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| WrappedError::Config(format!("year out of range: {year}")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| WrappedError::Config(format!("year out of range: {year}")))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_media_type_parse_variants() {
        assert_eq!(MediaType::parse("Movie"), Some(MediaType::Movie));
        assert_eq!(MediaType::parse("film"), Some(MediaType::Movie));
        assert_eq!(MediaType::parse("TV Show"), Some(MediaType::TvShow));
        assert_eq!(MediaType::parse("tv_show"), Some(MediaType::TvShow));
        assert_eq!(MediaType::parse("TVShow"), Some(MediaType::TvShow));
        assert_eq!(MediaType::parse("Series"), Some(MediaType::TvShow));
        assert_eq!(MediaType::parse("Podcast"), None);
        assert_eq!(MediaType::parse(""), None);
    }

    #[test]
    fn test_media_type_serde_labels() {
        assert_eq!(serde_json::to_string(&MediaType::TvShow).unwrap(), "\"TV Show\"");
        assert_eq!(serde_json::to_string(&MediaType::Movie).unwrap(), "\"Movie\"");
    }

    #[test]
    fn test_enriched_event_derives_calendar_fields() {
        let event = ViewingEvent {
            date: ymd(2020, 2, 10),
            raw_title: "Beta: Part 1".to_string(),
            runtime_minutes: 120,
        };
        let enriched = EnrichedEvent::new(event, "Beta".to_string(), None, None);
        assert_eq!(enriched.month, 2);
        assert_eq!(enriched.day_of_week, DayOfWeek::Monday);
        assert_eq!(enriched.raw_title, "Beta: Part 1");
        assert_eq!(enriched.runtime_minutes, 120);
    }

    #[test]
    fn test_date_range_inclusive_bounds() {
        let range = DateRange::calendar_year(2020).unwrap();
        assert!(range.contains(ymd(2020, 1, 1)));
        assert!(range.contains(ymd(2020, 12, 31)));
        assert!(!range.contains(ymd(2019, 12, 31)));
        assert!(!range.contains(ymd(2021, 1, 1)));
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        let err = DateRange::new(ymd(2021, 1, 1), ymd(2020, 1, 1)).unwrap_err();
        assert!(matches!(err, WrappedError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_date_range_single_day() {
        let day = ymd(2020, 6, 15);
        let range = DateRange::new(day, day).unwrap();
        assert!(range.contains(day));
        assert_eq!(range.to_string(), "2020-06-15 to 2020-06-15");
    }
}
