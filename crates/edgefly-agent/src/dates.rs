//! Relative/absolute date and duration parsing for free-text queries.
//!
//! Extraction is an ordered list of rules tried first-success-wins:
//! explicit spellings first, then relative expressions. Everything is
//! resolved against a caller-supplied "today" so results are deterministic
//! under test.

use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());

// DD/MM/YYYY, the form the original product accepted.
static SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());

// "5 Nov", "21st December"
static DAY_MONTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b")
        .unwrap()
});

// "Nov 5", "December 21st"
static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+(\d{1,2})(?:st|nd|rd|th)?\b")
        .unwrap()
});

static IN_DAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin\s+(\d{1,3})\s+days?\b").unwrap());

static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});

// "for 5 nights", "for a 7 day holiday"
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor\s+(?:a\s+)?(\d{1,3})[\s-]*(?:days?|nights?|holidays?)\b").unwrap()
});

static ONE_WAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bone[\s-]?way\b|\bno\s+return\b").unwrap());

type DateRule = fn(&str, NaiveDate) -> Option<NaiveDate>;

/// Ordered extraction rules; the first that yields a date wins.
const RULES: &[DateRule] = &[
    iso_date,
    slash_date,
    day_month,
    month_day,
    relative_word,
    in_days,
    next_weekday,
];

/// First date expression found in `text`, resolved against `today`.
pub fn first_date_in(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    RULES.iter().find_map(|rule| rule(text, today))
}

/// Trip length in days from a "for N days/nights" phrase.
pub fn duration_days(text: &str) -> Option<i64> {
    DURATION_RE
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Whether the text explicitly asks for one-way travel.
pub fn is_one_way(text: &str) -> bool {
    ONE_WAY_RE.is_match(text)
}

fn iso_date(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = ISO_RE.captures(text)?;
    NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}

fn slash_date(text: &str, _today: NaiveDate) -> Option<NaiveDate> {
    let caps = SLASH_RE.captures(text)?;
    NaiveDate::from_ymd_opt(
        caps[3].parse().ok()?,
        caps[2].parse().ok()?,
        caps[1].parse().ok()?,
    )
}

fn day_month(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = DAY_MONTH_RE.captures(text)?;
    named_month_date(&caps[2], caps[1].parse().ok()?, today)
}

fn month_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = MONTH_DAY_RE.captures(text)?;
    named_month_date(&caps[1], caps[2].parse().ok()?, today)
}

/// A day + named month without a year resolves to the next occurrence on or
/// after today.
fn named_month_date(month: &str, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let month = month_number(month)?;
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn relative_word(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_ascii_lowercase();
    if lower.contains("day after tomorrow") {
        Some(today + Duration::days(2))
    } else if lower.contains("tomorrow") {
        Some(today + Duration::days(1))
    } else if lower.contains("today") || lower.contains("tonight") {
        Some(today)
    } else {
        None
    }
}

fn in_days(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = IN_DAYS_RE.captures(text)?;
    let days: i64 = caps[1].parse().ok()?;
    Some(today + Duration::days(days))
}

/// A weekday name resolves to its next occurrence strictly after today,
/// with or without a "next"/"this" qualifier.
fn next_weekday(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = WEEKDAY_RE.captures(text)?;
    let target = match caps[1].to_ascii_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };

    let mut ahead = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64)
        .rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    Some(today + Duration::days(ahead))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-08-30 is a Sunday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn iso_and_slash_dates() {
        assert_eq!(
            first_date_in("depart 2026-09-04 please", today()),
            Some(date(2026, 9, 4))
        );
        assert_eq!(
            first_date_in("depart 21/12/2026", today()),
            Some(date(2026, 12, 21))
        );
    }

    #[test]
    fn relative_words() {
        assert_eq!(
            first_date_in("flights to Paris tomorrow", today()),
            Some(date(2026, 8, 31))
        );
        assert_eq!(first_date_in("leaving today", today()), Some(today()));
        assert_eq!(
            first_date_in("the day after tomorrow works", today()),
            Some(date(2026, 9, 1))
        );
    }

    #[test]
    fn weekday_resolves_strictly_after_today() {
        // Today is Sunday; "next Friday" lands on the coming Friday.
        assert_eq!(
            first_date_in("flights next friday", today()),
            Some(date(2026, 9, 4))
        );
        // Same weekday as today rolls a full week forward.
        assert_eq!(
            first_date_in("flights on sunday", today()),
            Some(date(2026, 9, 6))
        );
    }

    #[test]
    fn in_n_days() {
        assert_eq!(
            first_date_in("somewhere warm in 10 days", today()),
            Some(date(2026, 9, 9))
        );
    }

    #[test]
    fn named_month_rolls_to_next_year_when_past() {
        assert_eq!(
            first_date_in("fly on 5 Nov", today()),
            Some(date(2026, 11, 5))
        );
        assert_eq!(
            first_date_in("fly on March 3rd", today()),
            Some(date(2027, 3, 3))
        );
    }

    #[test]
    fn no_date_expression_yields_none() {
        assert_eq!(first_date_in("what is EdgeFly?", today()), None);
        assert_eq!(first_date_in("cheap flights to Rome", today()), None);
    }

    #[test]
    fn duration_phrases() {
        assert_eq!(duration_days("to DXB next friday for 5 nights"), Some(5));
        assert_eq!(duration_days("for a 7 day holiday"), Some(7));
        assert_eq!(duration_days("for 10 days in Bali"), Some(10));
        // Bare "in 3 days" is a departure offset, not a trip length.
        assert_eq!(duration_days("to Rome in 3 days"), None);
    }

    #[test]
    fn one_way_phrasing() {
        assert!(is_one_way("one way to Dubai tomorrow"));
        assert!(is_one_way("one-way please"));
        assert!(is_one_way("no return needed"));
        assert!(!is_one_way("return on Friday"));
    }
}
