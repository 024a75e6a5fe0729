//! Epic editor state and date-range validation.
//!
//! The editor accepts a date only when it keeps `start <= end` and both
//! endpoints inside the calendar months the project displays. A rejected
//! date is recorded as the draft's error and never replaces the current
//! value.

use chrono::NaiveDate;

use crate::dates;
use crate::error::RangeError;
use crate::model::{Epic, EpicUpdate, ProjectWindow};

/// Check a start/end pair against the window's editable bounds.
///
/// An inverted pair is reported before an out-of-window date.
pub fn validate_range(
    start: NaiveDate,
    end: NaiveDate,
    window: &ProjectWindow,
) -> Result<(), RangeError> {
    if start > end {
        return Err(RangeError::InvalidRange);
    }
    if !window.contains_for_edit(start) || !window.contains_for_edit(end) {
        return Err(RangeError::OutOfWindow);
    }
    Ok(())
}

/// In-progress edit of one epic.
#[derive(Debug, Clone, PartialEq)]
pub struct EpicDraft {
    window: ProjectWindow,
    pub name: String,
    pub tag_ids: Vec<String>,
    start: NaiveDate,
    end: NaiveDate,
    error: Option<RangeError>,
}

impl EpicDraft {
    /// Start editing an existing epic.
    pub fn from_epic(epic: &Epic, window: ProjectWindow) -> Self {
        Self {
            window,
            name: epic.name.clone(),
            tag_ids: epic.tag_ids.clone(),
            start: epic.start(),
            end: epic.end(),
            error: None,
        }
    }

    /// Blank draft for the next epic of a project with `existing` epics,
    /// dated `today`.
    pub fn new_epic(window: ProjectWindow, existing: usize, today: NaiveDate) -> Self {
        Self {
            window,
            name: format!("Nueva Épica {}", existing + 1),
            tag_ids: Vec::new(),
            start: today,
            end: today,
            error: None,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end
    }

    /// The last validation failure, cleared by the next accepted change.
    pub fn error(&self) -> Option<RangeError> {
        self.error
    }

    pub fn window(&self) -> &ProjectWindow {
        &self.window
    }

    /// Propose a new start date, checked against the current end date.
    pub fn set_start_date(&mut self, date: NaiveDate) -> Result<(), RangeError> {
        let result = if date > self.end {
            Err(RangeError::InvalidRange)
        } else {
            self.check_in_window(date)
        };
        self.record(result, |draft| draft.start = date)
    }

    /// Propose a new end date, checked against the current start date.
    pub fn set_end_date(&mut self, date: NaiveDate) -> Result<(), RangeError> {
        let result = if date < self.start {
            Err(RangeError::InvalidRange)
        } else {
            self.check_in_window(date)
        };
        self.record(result, |draft| draft.end = date)
    }

    /// Propose both endpoints at once, validated as a pair.
    pub fn set_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), RangeError> {
        let result = validate_range(start, end, &self.window);
        self.record(result, |draft| {
            draft.start = start;
            draft.end = end;
        })
    }

    fn check_in_window(&self, date: NaiveDate) -> Result<(), RangeError> {
        if self.window.contains_for_edit(date) {
            Ok(())
        } else {
            Err(RangeError::OutOfWindow)
        }
    }

    fn record(
        &mut self,
        result: Result<(), RangeError>,
        accept: impl FnOnce(&mut Self),
    ) -> Result<(), RangeError> {
        match result {
            Ok(()) => {
                accept(self);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e);
                Err(e)
            }
        }
    }

    /// Produce the update to apply to the epic.
    ///
    /// Refuses while an error is pending and re-checks both dates, since a
    /// draft loaded from an epic may already lie outside the window.
    pub fn commit(&mut self) -> Result<EpicUpdate, RangeError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if let Err(e) = validate_range(self.start, self.end, &self.window) {
            self.error = Some(e);
            return Err(e);
        }
        Ok(EpicUpdate {
            name: Some(self.name.clone()),
            start_date: Some(dates::format_project_date(self.start)),
            end_date: Some(dates::format_project_date(self.end)),
            status: None,
            tag_ids: Some(self.tag_ids.clone()),
        })
    }
}
