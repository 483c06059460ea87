use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").unwrap());
static LONG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([A-Za-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?\s*,?\s*(\d{4})$").unwrap()
});
/// Loose scan for something date-shaped at the start of a line, used by
/// detection heuristics and for flagging unparseable date tokens.
static DATE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{4}-\d{1,2}-\d{1,2}|[A-Za-z]{3,9}\.?\s+\d{1,2}(?:st|nd|rd|th)?\s*,?\s*\d{4})")
        .unwrap()
});

/// Normalizes a single token to a calendar date. Accepts ISO `YYYY-MM-DD`
/// and written `Month DD, YYYY` (full or three-letter month names).
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    if let Some(caps) = ISO_RE.captures(token) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    if let Some(caps) = LONG_RE.captures(token) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    None
}

/// Returns the date-shaped prefix of a line, if any, along with its length
/// in bytes. The prefix may still fail `parse_date` (e.g. month 13).
pub fn date_prefix(line: &str) -> Option<&str> {
    DATE_PREFIX_RE.find(line).map(|m| m.as_str())
}

pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Converts a pixel displacement into a whole-day displacement at the
/// active pixels-per-day scale, rounding to the nearest day.
pub fn px_to_days(dx: f32, pixels_per_day: f32) -> i64 {
    (dx / pixels_per_day).round() as i64
}

fn month_number(name: &str) -> Option<u32> {
    let lower = name.to_ascii_lowercase();
    let number = match lower.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_and_written_forms_agree() {
        let iso = parse_date("2024-01-15").unwrap();
        let written = parse_date("January 15, 2024").unwrap();
        assert_eq!(iso, written);
        assert_eq!(iso, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn accepts_abbreviated_months_and_ordinals() {
        assert_eq!(parse_date("Feb 1, 2024"), parse_date("2024-02-01"));
        assert_eq!(parse_date("March 3rd, 2024"), parse_date("2024-03-03"));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("2024-02-31"), None);
        assert_eq!(parse_date("Smarch 5, 2024"), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn date_prefix_matches_line_leading_dates() {
        assert_eq!(date_prefix("2024-01-15: Kickoff"), Some("2024-01-15"));
        assert_eq!(
            date_prefix("January 15, 2024: Kickoff"),
            Some("January 15, 2024")
        );
        assert_eq!(date_prefix("Kickoff on 2024-01-15"), None);
    }

    #[test]
    fn pixel_displacement_rounds_to_whole_days() {
        assert_eq!(px_to_days(8.0, 4.0), 2);
        assert_eq!(px_to_days(5.9, 4.0), 1);
        assert_eq!(px_to_days(-6.1, 4.0), -2);
        assert_eq!(px_to_days(1.0, 4.0), 0);
    }

    #[test]
    fn day_arithmetic_round_trips() {
        let start = parse_date("2024-01-15").unwrap();
        let end = parse_date("2024-02-15").unwrap();
        assert_eq!(days_between(start, end), 31);
        assert_eq!(add_days(start, 31), end);
    }
}
