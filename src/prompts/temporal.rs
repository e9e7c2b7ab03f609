use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::ingest::Dataset;

const TIME_WORDS: &[&str] = &[
    "date", "time", "year", "month", "day", "week", "quarter", "period", "timestamp", "datetime",
];

fn date_like() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^(\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}|\d{4}-\d{2}|(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*[ -]\d{2,4}|q[1-4][ -]?\d{2,4}|\d{4}[ -]?q[1-4])$",
        )
        .expect("date pattern is a valid regex")
    })
}

/// Split a header into lowercase words on separators and camelCase humps.
fn header_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn is_time_header(name: &str) -> bool {
    header_words(name).iter().any(|word| {
        let singular = word.strip_suffix('s').unwrap_or(word);
        TIME_WORDS.contains(&word.as_str()) || TIME_WORDS.contains(&singular)
    })
}

/// Whether a cell text reads as a date or a date-time.
pub fn looks_like_date(raw: &str) -> bool {
    let s = raw.trim();
    if s.len() < 6 {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || date_like().is_match(s)
}

/// Columns of the sample that carry time information, either by name or
/// because most of their sampled values are dates.
pub fn temporal_columns(dataset: &Dataset, sample_rows: usize) -> Vec<String> {
    dataset
        .columns
        .iter()
        .filter(|column| {
            if is_time_header(column) {
                return true;
            }
            let values = dataset.sampled_strings(column, sample_rows);
            let dates = values.iter().filter(|v| looks_like_date(v)).count();
            dates > 0 && dates * 2 >= values.len()
        })
        .cloned()
        .collect()
}
