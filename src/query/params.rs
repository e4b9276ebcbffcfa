use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::QueryParams;
use crate::profiles;

use super::dates;

// A date expression as it may appear inside a question: ISO, slash form,
// or month-name + year.
const DATE_ATOM: &str = r"\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{4}";

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?:from|between)\s+({atom})\s+(?:to|and|until|-)\s+({atom})",
        atom = DATE_ATOM
    ))
    .unwrap()
});

static SINGLE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:on|at|for)\s+(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4})",
    )
    .unwrap()
});

static DAYS_AGO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s+days?\s+ago").unwrap());

static TIMEFRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:last|past)\s+(\d+)\s+(days?|weeks?|months?|years?)").unwrap()
});

static LOCATION_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:in|at|for|of)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").unwrap()
});

#[derive(Debug, Clone, PartialEq)]
pub enum DateResolution {
    Range { start: String, end: String },
    Single(String),
}

/// Rule 1: explicit range, "from X to Y" / "between X and Y". A month-year
/// end date expands to the last day of that month; a month-year start keeps
/// day 01.
pub fn match_date_range(query: &str) -> Option<DateResolution> {
    let caps = DATE_RANGE.captures(query)?;
    let raw_start = caps.get(1)?.as_str();
    let raw_end = caps.get(2)?.as_str();

    let start = dates::normalize(raw_start);
    let mut end = dates::normalize(raw_end);
    if end.ends_with("-01") && dates::is_month_year(raw_end) {
        end = dates::month_end(&end);
    }

    Some(DateResolution::Range { start, end })
}

/// Rule 2: single date, "on/at/for X".
pub fn match_single_date(query: &str) -> Option<DateResolution> {
    let caps = SINGLE_DATE.captures(query)?;
    Some(DateResolution::Single(dates::normalize(caps.get(1)?.as_str())))
}

/// Rule 3: relative "N days ago" (window from then until today).
pub fn match_days_ago(query: &str, today: NaiveDate) -> Option<DateResolution> {
    let caps = DAYS_AGO.captures(query)?;
    let days: i64 = caps.get(1)?.as_str().parse().ok()?;
    Some(DateResolution::Range {
        start: iso(today - Duration::days(days)),
        end: iso(today),
    })
}

/// Rule 4: relative timeframe, "last/past N days|weeks|months|years".
/// Weeks are 7-day multiples; months and years are approximated as 30 and
/// 365 days.
pub fn match_timeframe(query: &str, today: NaiveDate) -> Option<DateResolution> {
    let caps = TIMEFRAME.captures(query)?;
    let count: i64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_lowercase();

    let days = if unit.starts_with("day") {
        count
    } else if unit.starts_with("week") {
        count * 7
    } else if unit.starts_with("month") {
        count * 30
    } else {
        count * 365
    };

    Some(DateResolution::Range {
        start: iso(today - Duration::days(days)),
        end: iso(today),
    })
}

/// Explicit prepositional location phrase ("in/at/for/of <Capitalized
/// words>"), if any.
pub fn location_phrase(query: &str) -> Option<String> {
    LOCATION_PHRASE
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract all parameters from a question.
///
/// Date rules are evaluated in priority order and are mutually exclusive;
/// location extraction always runs. When no temporal expression is found
/// the window defaults to the last 30 days.
pub fn extract(query: &str) -> QueryParams {
    extract_at(query, Local::now().date_naive())
}

/// Same as [`extract`] with an injectable "today" for deterministic tests.
pub fn extract_at(query: &str, today: NaiveDate) -> QueryParams {
    let mut params = QueryParams::default();

    // evaluated in priority order, first hit wins
    let resolution = match_date_range(query)
        .or_else(|| match_single_date(query))
        .or_else(|| match_days_ago(query, today))
        .or_else(|| match_timeframe(query, today));

    match resolution {
        Some(DateResolution::Range { start, end }) => {
            params.start_date = Some(start);
            params.end_date = Some(end);
        }
        Some(DateResolution::Single(date)) => {
            params.date = Some(date);
        }
        None => {}
    }

    params.location = resolve_location(query);

    if params.date.is_none() && params.start_date.is_none() {
        params.start_date = Some(iso(today - Duration::days(30)));
        params.end_date = Some(iso(today));
    }

    params
}

fn resolve_location(query: &str) -> Option<String> {
    if let Some(text) = location_phrase(query) {
        return match profiles::normalize_country(&text) {
            Some(code) => Some(code.to_string()),
            None => Some(text),
        };
    }
    profiles::find_country_mention(query).map(|code| code.to_string())
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_explicit_range() {
        let params = extract_at(
            "What were oil prices between 2023-01-01 and 2023-03-31?",
            day("2024-06-01"),
        );
        assert_eq!(params.start_date.as_deref(), Some("2023-01-01"));
        assert_eq!(params.end_date.as_deref(), Some("2023-03-31"));
        assert_eq!(params.date, None);
    }

    #[test]
    fn test_month_year_range_end_expands() {
        let res = match_date_range("from March 2024 to May 2024").unwrap();
        assert_eq!(
            res,
            DateResolution::Range {
                start: "2024-03-01".to_string(),
                end: "2024-05-31".to_string(),
            }
        );
    }

    #[test]
    fn test_single_date() {
        let res = match_single_date("oil price on 2024-02-14").unwrap();
        assert_eq!(res, DateResolution::Single("2024-02-14".to_string()));

        let res = match_single_date("price for 3/15/2024").unwrap();
        assert_eq!(res, DateResolution::Single("2024-03-15".to_string()));
    }

    #[test]
    fn test_days_ago() {
        let today = day("2024-06-10");
        let res = match_days_ago("oil prices 10 days ago", today).unwrap();
        assert_eq!(
            res,
            DateResolution::Range {
                start: "2024-05-31".to_string(),
                end: "2024-06-10".to_string(),
            }
        );
    }

    #[test]
    fn test_timeframe_units() {
        let today = day("2024-06-10");
        let cases = [
            ("last 5 days", 5),
            ("past 2 weeks", 14),
            ("last 3 months", 90),
            ("past 1 year", 365),
        ];
        for (text, expected_days) in cases {
            let res = match_timeframe(text, today).unwrap();
            match res {
                DateResolution::Range { start, end } => {
                    assert_eq!(end, "2024-06-10");
                    let start = day(&start);
                    assert_eq!((today - start).num_days(), expected_days, "{}", text);
                }
                other => panic!("expected range for '{}', got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_precedence_range_beats_timeframe() {
        let params = extract_at(
            "from 2023-01-01 to 2023-02-01 vs the last 7 days",
            day("2024-06-10"),
        );
        assert_eq!(params.start_date.as_deref(), Some("2023-01-01"));
        assert_eq!(params.end_date.as_deref(), Some("2023-02-01"));
    }

    #[test]
    fn test_default_window_is_30_days() {
        let today = day("2024-06-10");
        let params = extract_at("anything at all", today);
        assert_eq!(params.start_date.as_deref(), Some("2024-05-11"));
        assert_eq!(params.end_date.as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn test_location_from_phrase() {
        let params = extract_at(
            "What are current fuel prices in Germany?",
            day("2024-06-10"),
        );
        assert_eq!(params.location.as_deref(), Some("germany"));

        // alias phrase normalizes many-to-one
        let params = extract_at("fuel prices in United States", day("2024-06-10"));
        assert_eq!(params.location.as_deref(), Some("usa"));
    }

    #[test]
    fn test_location_free_text_kept_for_weather() {
        let params = extract_at("weather in London", day("2024-06-10"));
        assert_eq!(params.location.as_deref(), Some("London"));
    }

    #[test]
    fn test_location_standalone_mention() {
        let params = extract_at("germany diesel outlook", day("2024-06-10"));
        assert_eq!(params.location.as_deref(), Some("germany"));
    }
}
