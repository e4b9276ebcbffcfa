use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{4})")
        .unwrap()
});

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.to_lowercase();
    match prefix.as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Convert a date expression to ISO `YYYY-MM-DD`.
///
/// Accepts ISO (returned as-is), `M/D/Y` with 2-digit years expanded to
/// `20YY`, and `<Month-name> YYYY` (normalized to day 01 — the caller
/// decides whether that occurrence is a range start or needs [`month_end`]).
/// Anything else passes through unchanged; the first consumer that needs a
/// real calendar date rejects it there.
pub fn normalize(raw: &str) -> String {
    // Slash form: M/D/Y or M/D/YY
    if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() == 3 {
            let (month, day, mut year) = (parts[0], parts[1], parts[2].to_string());
            if year.len() == 2 {
                year = format!("20{}", year);
            }
            return format!("{}-{:0>2}-{:0>2}", year, month, day);
        }
    }

    // Month-name form: "May 2024", "Mar. 2023", "September 2022"
    if let Some(caps) = MONTH_YEAR.captures(raw) {
        if let Some(month) = month_number(&caps[1]) {
            return format!("{}-{:02}-01", &caps[2], month);
        }
    }

    raw.to_string()
}

/// Whether the expression is a month-plus-year reference (no day).
pub fn is_month_year(raw: &str) -> bool {
    MONTH_YEAR.is_match(raw) && !raw.chars().any(|c| c == '-' || c == '/')
}

/// Replace the day in an ISO date with the last calendar day of its month,
/// accounting for leap years. Non-ISO input passes through unchanged.
pub fn month_end(iso: &str) -> String {
    let mut parts = iso.splitn(3, '-');
    let (year, month) = match (
        parts.next().and_then(|y| y.parse::<i32>().ok()),
        parts.next().and_then(|m| m.parse::<u32>().ok()),
    ) {
        (Some(y), Some(m)) => (y, m),
        _ => return iso.to_string(),
    };

    match last_day_of_month(year, month) {
        Some(day) => format!("{}-{:02}-{:02}", year, month, day),
        None => iso.to_string(),
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    Some(first_of_next.pred_opt()?.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_round_trip() {
        assert_eq!(normalize("2024-05-03"), "2024-05-03");
    }

    #[test]
    fn test_slash_form() {
        assert_eq!(normalize("5/3/2024"), "2024-05-03");
        assert_eq!(normalize("12/31/2023"), "2023-12-31");
        // 2-digit years expand to 20YY
        assert_eq!(normalize("1/7/24"), "2024-01-07");
    }

    #[test]
    fn test_month_name_form() {
        assert_eq!(normalize("May 2024"), "2024-05-01");
        assert_eq!(normalize("september 2022"), "2022-09-01");
        assert_eq!(normalize("Mar. 2023"), "2023-03-01");
    }

    #[test]
    fn test_unparseable_passes_through() {
        assert_eq!(normalize("someday soon"), "someday soon");
        // month-day-year is not one of the recognized shapes
        assert_eq!(normalize("May 15th, 2024"), "May 15th, 2024");
    }

    #[test]
    fn test_month_end_expansion() {
        assert_eq!(month_end("2024-05-01"), "2024-05-31");
        assert_eq!(month_end("2024-02-01"), "2024-02-29"); // leap year
        assert_eq!(month_end("2023-02-01"), "2023-02-28");
        assert_eq!(month_end("2023-12-01"), "2023-12-31");
        assert_eq!(month_end("not a date"), "not a date");
    }

    #[test]
    fn test_is_month_year() {
        assert!(is_month_year("May 2024"));
        assert!(is_month_year("Dec. 2023"));
        assert!(!is_month_year("2024-05-01"));
        assert!(!is_month_year("5/3/2024"));
    }
}
