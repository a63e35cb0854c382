//! The year-in-review summary: totals, catalog breakdown, title and genre
//! rankings, and the monthly and weekday distributions.

use std::collections::HashSet;

use serde::Serialize;
use wrapped_core::calendar::DayOfWeek;
use wrapped_core::formatting::{minutes_to_hours, round_half_even};
use wrapped_core::models::{EnrichedEvent, MediaType};

use crate::aggregator::{distribution, peak, rank, rank_by, top_k, Bucket};

/// Number of favourites reported when not configured otherwise.
pub const DEFAULT_TOP_K: usize = 3;

const MONTHS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

// ── Views ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_minutes: u64,
    /// Whole hours, rounded down.
    pub total_hours: u64,
    /// `total_hours / 24`, rounded to two decimals.
    pub total_days: f64,
}

impl Totals {
    pub fn from_minutes(total_minutes: u64) -> Self {
        let total_hours = total_minutes / 60;
        Self {
            total_minutes,
            total_hours,
            total_days: round_half_even(total_hours as f64 / 24.0, 2),
        }
    }
}

/// Distinct titles overall and per media type.
///
/// Titles without a reference match are counted under `unknown_media` and
/// still included in `distinct_titles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogBreakdown {
    pub distinct_titles: usize,
    pub tv_shows: usize,
    pub movies: usize,
    pub unknown_media: usize,
}

impl CatalogBreakdown {
    fn from_events(data: &[EnrichedEvent]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut breakdown = Self::default();

        for event in data {
            if !seen.insert(event.clean_title.as_str()) {
                continue;
            }
            breakdown.distinct_titles += 1;
            match event.media_type {
                Some(MediaType::TvShow) => breakdown.tv_shows += 1,
                Some(MediaType::Movie) => breakdown.movies += 1,
                None => breakdown.unknown_media += 1,
            }
        }

        breakdown
    }
}

/// Every view derived from one enriched dataset.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Number of enriched events summarized.
    pub events: usize,
    pub totals: Totals,
    pub catalog: CatalogBreakdown,
    /// All titles, most watched first.
    pub title_ranking: Vec<Bucket<String>>,
    pub top_titles: Vec<Bucket<String>>,
    /// Distinct non-null genres.
    pub genre_count: usize,
    /// All genres, most watched first. Events without a genre are excluded.
    pub genre_ranking: Vec<Bucket<String>>,
    pub top_genres: Vec<Bucket<String>>,
    /// Hours from events with no genre.
    pub unclassified_hours: f64,
    /// Months 1–12 in calendar order.
    pub monthly: Vec<Bucket<u32>>,
    /// Monday through Sunday.
    pub weekdays: Vec<Bucket<DayOfWeek>>,
    /// The seven weekdays, most watched first; ties keep Monday-first order.
    pub weekday_ranking: Vec<Bucket<DayOfWeek>>,
    /// `None` only for an empty dataset.
    pub peak_month: Option<u32>,
    /// `None` only for an empty dataset.
    pub peak_day: Option<DayOfWeek>,
}

impl Summary {
    /// True when no event survived cleaning.
    pub fn is_empty(&self) -> bool {
        self.events == 0
    }
}

// ── Summarizer ────────────────────────────────────────────────────────────────

/// Builds a [`Summary`]; only the favourites count is configurable.
#[derive(Debug, Clone, Copy)]
pub struct Summarizer {
    top_k: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K)
    }
}

impl Summarizer {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn summarize(&self, data: &[EnrichedEvent]) -> Summary {
        let total_minutes: u64 = data.iter().map(|e| u64::from(e.runtime_minutes)).sum();

        let title_ranking = rank_by(data, |e| Some(e.clean_title.clone()));
        let genre_ranking = rank_by(data, |e| e.genre.clone());
        let unclassified_minutes: u64 = data
            .iter()
            .filter(|e| e.genre.is_none())
            .map(|e| u64::from(e.runtime_minutes))
            .sum();

        let monthly = distribution(data, &MONTHS, |e| e.month);
        let weekdays = distribution(data, &DayOfWeek::ALL, |e| e.day_of_week);
        let weekday_ranking = rank(weekdays.clone());
        let (peak_month, peak_day) = if data.is_empty() {
            (None, None)
        } else {
            (peak(&monthly), peak(&weekdays))
        };

        Summary {
            events: data.len(),
            totals: Totals::from_minutes(total_minutes),
            catalog: CatalogBreakdown::from_events(data),
            top_titles: top_k(&title_ranking, self.top_k).to_vec(),
            title_ranking,
            genre_count: genre_ranking.len(),
            top_genres: top_k(&genre_ranking, self.top_k).to_vec(),
            genre_ranking,
            unclassified_hours: minutes_to_hours(unclassified_minutes),
            peak_month,
            peak_day,
            monthly,
            weekdays,
            weekday_ranking,
        }
    }
}

/// Summarize with the default favourites count.
pub fn summarize(data: &[EnrichedEvent]) -> Summary {
    Summarizer::default().summarize(data)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
