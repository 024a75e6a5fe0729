use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::epic::Epic;
use super::progress;
use super::tag::Tag;
use super::timeline::ProjectWindow;
use crate::dates;

pub const DEFAULT_MONTHS_TO_DISPLAY: u32 = 6;

/// A planned project: summary metadata, a timeline window, epics and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(alias = "project_name")]
    pub project_name: String,
    #[serde(default, alias = "total_estimated_hours")]
    pub total_estimated_hours: f64,
    #[serde(default, alias = "total_consumed_hours")]
    pub total_consumed_hours: f64,
    #[serde(default, alias = "current_phase")]
    pub current_phase: String,
    #[serde(default, alias = "total_tasks")]
    pub total_tasks: u32,
    /// Progress shown on the project card, 0-100.
    #[serde(default, alias = "progress_status")]
    pub progress_status: u8,
    /// Month label the timeline starts on, e.g. "enero 2024".
    #[serde(alias = "start_month")]
    pub start_month: String,
    #[serde(default = "default_months", alias = "months_to_display")]
    pub months_to_display: u32,
    /// RFC 3339 timestamp the project was dated at.
    #[serde(default, alias = "project_date", alias = "currentDate")]
    pub project_date: String,
    #[serde(default)]
    pub epics: Vec<Epic>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

fn default_months() -> u32 {
    DEFAULT_MONTHS_TO_DISPLAY
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            project_name: "Proyecto sin título".to_string(),
            total_estimated_hours: 0.0,
            total_consumed_hours: 0.0,
            current_phase: String::new(),
            total_tasks: 0,
            progress_status: 0,
            start_month: dates::format_month(dates::today()),
            months_to_display: DEFAULT_MONTHS_TO_DISPLAY,
            project_date: Utc::now().to_rfc3339(),
            epics: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            project_name: name.into(),
            ..Default::default()
        }
    }

    /// The timeline window, or `None` when `start_month` does not parse or
    /// `months_to_display` is zero.
    pub fn window(&self) -> Option<ProjectWindow> {
        ProjectWindow::new(&self.start_month, self.months_to_display)
    }

    /// Progress derived from epic statuses.
    pub fn derived_progress(&self) -> u8 {
        progress::calculate_progress(&self.epics)
    }

    /// Store the derived progress in `progress_status`.
    pub fn refresh_progress(&mut self) {
        self.progress_status = self.derived_progress();
    }

    pub fn remaining_hours(&self) -> f64 {
        (self.total_estimated_hours - self.total_consumed_hours).max(0.0)
    }

    pub fn hours_consumed_percentage(&self) -> u8 {
        progress::hours_consumed_percentage(self.total_consumed_hours, self.total_estimated_hours)
    }

    pub fn epic(&self, id: Uuid) -> Option<&Epic> {
        self.epics.iter().find(|e| e.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }
}

/// All known projects plus the one currently selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectList {
    #[serde(default)]
    pub selected_project_id: Option<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

impl ProjectList {
    pub fn selected(&self) -> Option<&Project> {
        let id = self.selected_project_id.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }
}
