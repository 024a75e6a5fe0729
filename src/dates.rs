//! Date parsing and formatting for project timelines.
//!
//! Epic dates are exchanged as long-form Spanish strings ("15 de enero 2024")
//! or ISO-8601 timestamps. Project windows are anchored on month labels
//! ("enero 2024").

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use log::warn;

/// Spanish month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// The current calendar day in local time.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Month number (1-12) for a Spanish month name, case-insensitive.
fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

/// Parse an ISO-8601 timestamp, keeping only the calendar day as written.
fn parse_iso(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse the long form "D de MONTHNAME YYYY".
fn parse_long_form(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    let [day, de, month, year] = parts.as_slice() else {
        return None;
    };
    if !de.eq_ignore_ascii_case("de") {
        return None;
    }
    let day: u32 = day.parse().ok()?;
    let month = month_number(month)?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Strict date parse. Returns `None` for anything that is not an ISO-8601
/// timestamp or a long-form project date.
pub fn try_parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.contains('T') {
        parse_iso(s)
    } else {
        parse_long_form(s)
    }
}

/// Parse a project date, falling back to today on malformed input.
///
/// Never fails: empty strings, garbage, and dates written with another
/// locale's month names all resolve to the current day after logging a
/// warning.
pub fn parse_date(input: &str) -> NaiveDate {
    match try_parse_date(input) {
        Some(d) => d,
        None => {
            warn!("Error parsing date {:?}, falling back to today", input);
            today()
        }
    }
}

/// Format a date in the long form used by project files: "15 de enero 2024".
pub fn format_project_date(date: NaiveDate) -> String {
    format!("{} de {} {}", date.day(), month_name(date), date.year())
}

/// Parse a month label ("enero 2024") to the first day of that month.
pub fn parse_month(input: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let [month, year] = parts.as_slice() else {
        return None;
    };
    let month = month_number(month)?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Format the month label for the month containing `date`.
pub fn format_month(date: NaiveDate) -> String {
    format!("{} {}", month_name(date), date.year())
}

/// Short numeric form shown on timeline bars: "15/01/2024".
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Anything that can stand in for "now" on the timeline.
pub trait ProjectDate {
    fn to_project_date(&self) -> NaiveDate;

    /// Like [`to_project_date`](Self::to_project_date), but `None` for
    /// text that is not a date instead of today.
    fn try_project_date(&self) -> Option<NaiveDate> {
        Some(self.to_project_date())
    }
}

impl ProjectDate for NaiveDate {
    fn to_project_date(&self) -> NaiveDate {
        *self
    }
}

impl ProjectDate for NaiveDateTime {
    fn to_project_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> ProjectDate for DateTime<Tz> {
    fn to_project_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl ProjectDate for str {
    fn to_project_date(&self) -> NaiveDate {
        parse_date(self)
    }

    fn try_project_date(&self) -> Option<NaiveDate> {
        try_parse_date(self)
    }
}

impl ProjectDate for String {
    fn to_project_date(&self) -> NaiveDate {
        parse_date(self)
    }

    fn try_project_date(&self) -> Option<NaiveDate> {
        try_parse_date(self)
    }
}

impl<T: ProjectDate + ?Sized> ProjectDate for &T {
    fn to_project_date(&self) -> NaiveDate {
        (**self).to_project_date()
    }

    fn try_project_date(&self) -> Option<NaiveDate> {
        (**self).try_project_date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_long_form_case_insensitively() {
        assert_eq!(try_parse_date("15 de enero 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(try_parse_date("15 de Diciembre 2023"), Some(ymd(2023, 12, 15)));
        assert_eq!(try_parse_date("  1 DE marzo   2025 "), Some(ymd(2025, 3, 1)));
    }

    #[test]
    fn parses_iso_timestamps() {
        assert_eq!(
            try_parse_date("2024-03-05T10:30:00.000Z"),
            Some(ymd(2024, 3, 5))
        );
        assert_eq!(
            try_parse_date("2024-03-05T23:30:00-05:00"),
            Some(ymd(2024, 3, 5))
        );
        assert_eq!(try_parse_date("2024-03-05T08:15"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn malformed_input_falls_back_to_today() {
        for input in ["", "garbage", "15 de January 2024", "31 de febrero 2024", "2024-13-01T00:00:00Z"] {
            assert_eq!(try_parse_date(input), None, "{input:?}");
            let before = today();
            let parsed = parse_date(input);
            let after = today();
            assert!(parsed == before || parsed == after);
        }
    }

    #[test]
    fn format_round_trips_calendar_day() {
        let mut d = ymd(2023, 11, 20);
        for _ in 0..500 {
            assert_eq!(parse_date(&format_project_date(d)), d);
            d += chrono::Duration::days(3);
        }
        assert_eq!(format_project_date(ymd(2024, 1, 5)), "5 de enero 2024");
    }

    #[test]
    fn month_labels() {
        assert_eq!(parse_month("enero 2024"), Some(ymd(2024, 1, 1)));
        assert_eq!(parse_month("Septiembre 2025"), Some(ymd(2025, 9, 1)));
        assert_eq!(parse_month("january 2024"), None);
        assert_eq!(parse_month(""), None);
        assert_eq!(format_month(ymd(2024, 7, 19)), "julio 2024");
    }

    #[test]
    fn short_date() {
        assert_eq!(format_short_date(ymd(2024, 1, 5)), "05/01/2024");
    }

    #[test]
    fn project_date_sources_agree() {
        let d = ymd(2024, 2, 29);
        let dt = d.and_hms_opt(18, 0, 0).unwrap();
        assert_eq!(d.to_project_date(), d);
        assert_eq!(dt.to_project_date(), d);
        assert_eq!("29 de febrero 2024".to_project_date(), d);
        assert_eq!(String::from("2024-02-29T18:00:00Z").to_project_date(), d);
    }
}
