//! Text and JSON rendering of a [`PipelineResult`].

use std::fmt::Write as _;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;
use wrapped_core::calendar::month_name;
use wrapped_core::formatting::{format_hours, format_number, join_list, percentage};
use wrapped_data::aggregator::Bucket;
use wrapped_data::analysis::PipelineResult;
use wrapped_data::summary::Summary;

const RULE_WIDTH: usize = 48;

// ── Sentences ─────────────────────────────────────────────────────────────────

/// The headline sentences of the wrap-up, in display order.
///
/// Sentences that would have nothing to say (no favourite titles or genres) are
/// left out. An empty summary yields a single "nothing watched" line.
pub fn headline(summary: &Summary, period_label: &str) -> Vec<String> {
    if summary.is_empty() {
        return vec![format!("No viewing activity found for {period_label}.")];
    }

    let mut lines = vec![
        format!(
            "Days Watched : {}",
            format_number(summary.totals.total_days, 2)
        ),
        format!("Hours Watched : {}", summary.totals.total_hours),
        format!(
            "You watched {} titles this year: {} tv shows and {} movies.",
            summary.catalog.distinct_titles, summary.catalog.tv_shows, summary.catalog.movies
        ),
    ];

    if !summary.top_titles.is_empty() {
        lines.push(format!(
            "Your favorite shows were {}.",
            join_list(&keys(&summary.top_titles))
        ));
    }

    lines.push(format!(
        "You explored {} different genres this year.",
        summary.genre_count
    ));

    if !summary.top_genres.is_empty() {
        lines.push(format!(
            "Your favorite genres were {}.",
            join_list(&keys(&summary.top_genres))
        ));
    }

    if let (Some(month), Some(day)) = (summary.peak_month.and_then(month_name), summary.peak_day) {
        lines.push(format!(
            "You were with us the most in {month}, and you really enjoyed relaxing on {day}s."
        ));
    }

    lines
}

fn keys(buckets: &[Bucket<String>]) -> Vec<&str> {
    buckets.iter().map(|b| b.key.as_str()).collect()
}

fn period_label(result: &PipelineResult) -> String {
    result
        .metadata
        .period
        .map(|p| p.to_string())
        .unwrap_or_else(|| "all recorded history".to_string())
}

// ── Text report ───────────────────────────────────────────────────────────────

/// Render the full text report: headline sentences, ranking tables and a
/// data-quality footer.
pub fn render_text(result: &PipelineResult) -> String {
    let summary = &result.summary;
    let label = period_label(result);
    let mut out = String::new();

    let _ = writeln!(out, "Watch Wrapped: {label}");
    let _ = writeln!(out, "{}", "═".repeat(RULE_WIDTH));
    for line in headline(summary, &label) {
        let _ = writeln!(out, "{line}");
    }

    if !summary.is_empty() {
        let total_hours = summary.totals.total_minutes as f64 / 60.0;

        out.push('\n');
        out.push_str(&table(
            "Titles",
            summary
                .title_ranking
                .iter()
                .map(|b| (b.key.clone(), b.hours)),
            total_hours,
        ));

        out.push('\n');
        let mut genres: Vec<(String, f64)> = summary
            .genre_ranking
            .iter()
            .map(|b| (b.key.clone(), b.hours))
            .collect();
        if summary.unclassified_hours > 0.0 {
            genres.push(("(unclassified)".to_string(), summary.unclassified_hours));
        }
        out.push_str(&table("Genres", genres, total_hours));

        out.push('\n');
        out.push_str(&table(
            "Months",
            summary.monthly.iter().map(|b| {
                let name = month_name(b.key).unwrap_or("?").to_string();
                (name, b.hours)
            }),
            total_hours,
        ));

        out.push('\n');
        out.push_str(&table(
            "Weekdays",
            summary
                .weekdays
                .iter()
                .map(|b| (b.key.name().to_string(), b.hours)),
            total_hours,
        ));
    }

    out.push('\n');
    out.push_str(&footer(result));
    out
}

/// A `label | hours | share` table under a section heading.
fn table<I>(heading: &str, rows: I, total_hours: f64) -> String
where
    I: IntoIterator<Item = (String, f64)>,
{
    let rows: Vec<(String, f64)> = rows.into_iter().collect();
    let width = rows
        .iter()
        .map(|(label, _)| label.width())
        .max()
        .unwrap_or(0)
        .max(heading.width());

    let mut out = String::new();
    let _ = writeln!(out, "{}  {:>10}  {:>6}", pad(heading, width), "Hours", "Share");
    let _ = writeln!(out, "{}", "─".repeat(width + 20));
    for (label, hours) in rows {
        let share = percentage(hours, total_hours, 1);
        let _ = writeln!(
            out,
            "{}  {:>10}  {:>5}%",
            pad(&label, width),
            format_hours(hours),
            format_number(share, 1)
        );
    }
    out
}

/// Left-align `s` to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

fn footer(result: &PipelineResult) -> String {
    let diag = &result.diagnostics;
    let clean = &diag.clean;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} of {} records summarized; {} malformed, {} outside the period.",
        clean.enriched,
        clean.records_read,
        clean.malformed.total(),
        clean.out_of_period
    );
    if clean.unmatched_titles > 0 {
        let _ = writeln!(
            out,
            "{} titles had no reference entry.",
            clean.unmatched_titles
        );
    }
    if !clean.ambiguous_titles.is_empty() {
        let _ = writeln!(
            out,
            "Ambiguous reference titles (first entry used): {}.",
            join_list(&clean.ambiguous_titles)
        );
    }
    let skipped = diag.unreadable_history_rows + diag.unreadable_reference_rows;
    if skipped > 0 {
        let _ = writeln!(out, "{skipped} unreadable CSV rows skipped.");
    }
    if let Some(path) = &result.metadata.written_to {
        let _ = writeln!(out, "Enriched dataset written to {}.", path.display());
    }
    out
}

// ── JSON report ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct JsonReport<'a> {
    headline: Vec<String>,
    #[serde(flatten)]
    result: &'a PipelineResult,
}

/// Render the summary, diagnostics and metadata as pretty-printed JSON.
pub fn render_json(result: &PipelineResult) -> anyhow::Result<String> {
    let report = JsonReport {
        headline: headline(&result.summary, &period_label(result)),
        result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
