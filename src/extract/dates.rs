// src/extract/dates.rs
use chrono::{Days, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

use crate::models::UNRESOLVED;

static DAYS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+days?\s+ago").expect("valid regex"));
static HOURS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+hours?\s+ago").expect("valid regex"));
static WEEKS_AGO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+weeks?\s+ago").expect("valid regex"));

/// The local calendar date posting ages are resolved against by default.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Calendar date for a posting-age string such as "3 days ago" or "Just now".
///
/// Anything unrecognised, including absolute dates, falls back to `today`.
pub fn normalize_date_at(text: &str, today: NaiveDate) -> NaiveDate {
    let text = text.trim();
    if text.is_empty() || text == UNRESOLVED {
        return today;
    }

    let text = text.to_lowercase();
    if text.contains("just now") || text.contains("today") {
        return today;
    }

    if let Some(days) = leading_count(&DAYS_AGO, &text) {
        return days_before(today, days);
    }

    // Hours never move the calendar date.
    if HOURS_AGO.is_match(&text) {
        return today;
    }

    if let Some(weeks) = leading_count(&WEEKS_AGO, &text) {
        return days_before(today, weeks.saturating_mul(7));
    }

    today
}

fn leading_count(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}
