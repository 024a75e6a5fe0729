use chrono::{Datelike, Months, NaiveDate};
use log::warn;

use crate::dates::{self, ProjectDate};

/// Days per displayed month. Timeline months are four weeks long, not
/// calendar months, so six months span 168 days.
pub const DAYS_PER_MONTH: i64 = 28;

/// Returned by [`ProjectWindow::current_date_position`] when the marker
/// should not be drawn.
pub const HIDDEN_MARKER: f64 = -1.0;

/// Header cell for one displayed month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthLabel {
    /// `yyyy-mm`, stable across locales.
    pub key: String,
    /// Display label, e.g. "enero 2024".
    pub label: String,
}

/// The visible horizon of a project timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectWindow {
    /// First day of the start month.
    pub start: NaiveDate,
    pub months_to_display: u32,
}

impl ProjectWindow {
    /// Build a window from a month label such as "enero 2024".
    ///
    /// Returns `None` when the label does not parse or `months_to_display`
    /// is zero.
    pub fn new(start_month: &str, months_to_display: u32) -> Option<Self> {
        let start = dates::parse_month(start_month)?;
        Self::from_start(start, months_to_display)
    }

    /// Build a window anchored on the month containing `date`.
    pub fn from_start(date: NaiveDate, months_to_display: u32) -> Option<Self> {
        if months_to_display == 0 {
            return None;
        }
        let start = date.with_day(1)?;
        Some(Self {
            start,
            months_to_display,
        })
    }

    /// Month label of the window start.
    pub fn start_month(&self) -> String {
        dates::format_month(self.start)
    }

    /// End of the positioning span: `start + months * 4 weeks`.
    pub fn window_end(&self) -> NaiveDate {
        self.start + chrono::Duration::days(self.total_days())
    }

    fn total_days(&self) -> i64 {
        i64::from(self.months_to_display) * DAYS_PER_MONTH
    }

    /// Map a date onto `[0, 100]`. Dates outside the window clamp to the
    /// edges so overflowing epics still render.
    pub fn position(&self, date: NaiveDate) -> f64 {
        let offset = (date - self.start).num_days() as f64;
        let position = offset / self.total_days() as f64 * 100.0;
        position.clamp(0.0, 100.0)
    }

    /// Position of the "today" marker, or [`HIDDEN_MARKER`] when `now` lies
    /// strictly outside `[start, window_end]`.
    pub fn current_date_position(&self, now: NaiveDate) -> f64 {
        if now < self.start || now > self.window_end() {
            return HIDDEN_MARKER;
        }
        self.position(now)
    }

    /// Earliest date the epic editor accepts.
    pub fn min_date(&self) -> NaiveDate {
        self.start
    }

    /// Latest date the epic editor accepts: the last day of the final
    /// displayed calendar month.
    pub fn max_date(&self) -> NaiveDate {
        let next = self.start + Months::new(self.months_to_display);
        next.pred_opt().unwrap_or(next)
    }

    /// Whether the editor accepts `date`.
    pub fn contains_for_edit(&self, date: NaiveDate) -> bool {
        date >= self.min_date() && date <= self.max_date()
    }

    /// Header labels, one per displayed calendar month.
    pub fn months(&self) -> Vec<MonthLabel> {
        (0..self.months_to_display)
            .map(|i| {
                let date = self.start + Months::new(i);
                MonthLabel {
                    key: date.format("%Y-%m").to_string(),
                    label: dates::format_month(date),
                }
            })
            .collect()
    }
}

/// Horizontal position of `date` within the window starting at
/// `start_month`, as a percentage in `[0, 100]`.
///
/// An unparseable `date` or `start_month`, or an empty window, yields `0.0`.
pub fn calculate_position(date: &str, start_month: &str, months_to_display: u32) -> f64 {
    let parsed = dates::try_parse_date(date);
    match (parsed, ProjectWindow::new(start_month, months_to_display)) {
        (Some(parsed), Some(window)) => window.position(parsed),
        _ => {
            warn!(
                "Invalid date: date={:?} start_month={:?} months_to_display={}",
                date, start_month, months_to_display
            );
            0.0
        }
    }
}

/// Position of the "today" marker, or `-1.0` when it should not be drawn.
///
/// Callers gate drawing on `position >= 0.0`. A `now` string that is not a
/// date hides the marker.
pub fn calculate_current_date_position<D: ProjectDate + ?Sized>(
    now: &D,
    start_month: &str,
    months_to_display: u32,
) -> f64 {
    let parsed = now.try_project_date();
    match (parsed, ProjectWindow::new(start_month, months_to_display)) {
        (Some(now), Some(window)) => window.current_date_position(now),
        _ => {
            warn!(
                "Invalid date: now={:?} start_month={:?} months_to_display={}",
                parsed, start_month, months_to_display
            );
            HIDDEN_MARKER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_month_scenario() {
        assert_eq!(calculate_position("1 de enero 2024", "enero 2024", 1), 0.0);
        assert_eq!(calculate_position("15 de enero 2024", "enero 2024", 1), 50.0);
        assert_eq!(calculate_position("29 de enero 2024", "enero 2024", 1), 100.0);
    }

    #[test]
    fn clamps_outside_window() {
        assert_eq!(calculate_position("1 de enero 1990", "enero 2024", 6), 0.0);
        assert_eq!(calculate_position("1 de enero 2090", "enero 2024", 6), 100.0);
        assert_eq!(calculate_position("2023-12-31T00:00:00Z", "enero 2024", 6), 0.0);
    }

    #[test]
    fn window_end_uses_four_week_months() {
        let window = ProjectWindow::new("enero 2024", 6).unwrap();
        assert_eq!(window.window_end(), ymd(2024, 1, 1) + chrono::Duration::days(168));
        assert_eq!(window.window_end(), ymd(2024, 6, 17));
    }

    #[test]
    fn monotonic_across_window() {
        let window = ProjectWindow::new("marzo 2024", 3).unwrap();
        let mut last = -1.0;
        let mut d = ymd(2024, 2, 1);
        while d < ymd(2024, 7, 1) {
            let p = window.position(d);
            assert!(p >= last, "{d}: {p} < {last}");
            assert!((0.0..=100.0).contains(&p));
            last = p;
            d += chrono::Duration::days(1);
        }
    }

    #[test]
    fn unparseable_date_is_zero() {
        assert_eq!(calculate_position("garbage", "enero 2024", 6), 0.0);
        assert_eq!(calculate_position("", "enero 2024", 6), 0.0);
        assert_eq!(calculate_position("31 de febrero 2024", "enero 2024", 6), 0.0);
        assert_eq!(calculate_current_date_position("garbage", "enero 2024", 6), -1.0);
        assert_eq!(
            calculate_current_date_position(&String::from("15 de January 2024"), "enero 2024", 6),
            -1.0
        );
    }

    #[test]
    fn invalid_start_month_is_zero() {
        assert_eq!(calculate_position("15 de enero 2024", "January 2024", 6), 0.0);
        assert_eq!(calculate_position("15 de enero 2024", "enero 2024", 0), 0.0);
    }

    #[test]
    fn marker_sentinel() {
        let before = ymd(2023, 12, 31);
        let first = ymd(2024, 1, 1);
        assert_eq!(calculate_current_date_position(&before, "enero 2024", 6), -1.0);
        assert_eq!(calculate_current_date_position(&first, "enero 2024", 6), 0.0);

        let end = ymd(2024, 6, 17);
        assert_eq!(calculate_current_date_position(&end, "enero 2024", 6), 100.0);
        let after = ymd(2024, 6, 18);
        assert_eq!(calculate_current_date_position(&after, "enero 2024", 6), -1.0);

        assert_eq!(
            calculate_current_date_position("15 de enero 2024", "enero 2024", 1),
            50.0
        );
        assert_eq!(calculate_current_date_position(&first, "garbage", 6), -1.0);
    }

    #[test]
    fn editor_bounds_follow_calendar_months() {
        let window = ProjectWindow::new("enero 2024", 6).unwrap();
        assert_eq!(window.min_date(), ymd(2024, 1, 1));
        assert_eq!(window.max_date(), ymd(2024, 6, 30));
        assert!(window.contains_for_edit(ymd(2024, 6, 30)));
        assert!(!window.contains_for_edit(ymd(2023, 12, 15)));
        assert!(!window.contains_for_edit(ymd(2024, 7, 1)));

        let feb = ProjectWindow::new("febrero 2024", 1).unwrap();
        assert_eq!(feb.max_date(), ymd(2024, 2, 29));
    }

    #[test]
    fn month_headers() {
        let window = ProjectWindow::new("noviembre 2024", 3).unwrap();
        let labels: Vec<_> = window.months().into_iter().map(|m| (m.key, m.label)).collect();
        assert_eq!(
            labels,
            vec![
                ("2024-11".to_string(), "noviembre 2024".to_string()),
                ("2024-12".to_string(), "diciembre 2024".to_string()),
                ("2025-01".to_string(), "enero 2025".to_string()),
            ]
        );
    }

    #[test]
    fn from_start_snaps_to_first_of_month() {
        let window = ProjectWindow::from_start(ymd(2024, 5, 20), 2).unwrap();
        assert_eq!(window.start, ymd(2024, 5, 1));
        assert_eq!(window.start_month(), "mayo 2024");
        assert!(ProjectWindow::from_start(ymd(2024, 5, 20), 0).is_none());
    }
}
