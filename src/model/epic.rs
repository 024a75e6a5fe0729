use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tag::Tag;
use super::timeline::ProjectWindow;
use crate::dates;

/// Lifecycle state of an epic.
///
/// Serialized with the labels used by exported project files; the English
/// variant names are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EpicStatus {
    #[default]
    #[serde(rename = "No Iniciada", alias = "NotStarted")]
    NotStarted,
    #[serde(rename = "En Progreso", alias = "InProgress")]
    InProgress,
    #[serde(rename = "Completada", alias = "Completed")]
    Completed,
    #[serde(rename = "Atrasada", alias = "Delayed")]
    Delayed,
}

impl EpicStatus {
    pub const ALL: [EpicStatus; 4] = [
        EpicStatus::NotStarted,
        EpicStatus::InProgress,
        EpicStatus::Completed,
        EpicStatus::Delayed,
    ];

    /// Label as written in project files.
    pub fn label(self) -> &'static str {
        match self {
            EpicStatus::NotStarted => "No Iniciada",
            EpicStatus::InProgress => "En Progreso",
            EpicStatus::Completed => "Completada",
            EpicStatus::Delayed => "Atrasada",
        }
    }

    /// Parse a status from a file label, an English name, or a common
    /// synonym.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "no iniciada" | "notstarted" | "not started" | "not-started" | "new" | "planned" => {
                Some(EpicStatus::NotStarted)
            }
            "en progreso" | "inprogress" | "in progress" | "in-progress" | "active" | "started" => {
                Some(EpicStatus::InProgress)
            }
            "completada" | "completed" | "complete" | "finished" | "done" => {
                Some(EpicStatus::Completed)
            }
            "atrasada" | "delayed" | "late" | "overdue" => Some(EpicStatus::Delayed),
            _ => None,
        }
    }

    /// Next status in the timeline's click-to-cycle order.
    pub fn next(self) -> Self {
        match self {
            EpicStatus::NotStarted => EpicStatus::InProgress,
            EpicStatus::InProgress => EpicStatus::Completed,
            EpicStatus::Completed => EpicStatus::Delayed,
            EpicStatus::Delayed => EpicStatus::NotStarted,
        }
    }

    /// Whether the status counts towards aggregate project progress.
    /// In-progress epics weigh the same as completed ones.
    pub fn counts_as_progress(self) -> bool {
        matches!(self, EpicStatus::Completed | EpicStatus::InProgress)
    }
}

impl std::fmt::Display for EpicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A work phase on the project timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    /// Long-form date ("15 de enero 2024") or ISO-8601 timestamp.
    #[serde(alias = "start_date")]
    pub start_date: String,
    #[serde(alias = "end_date")]
    pub end_date: String,
    #[serde(default)]
    pub status: EpicStatus,
    /// Tag ids; may reference tags that no longer exist.
    #[serde(default, alias = "tag_ids")]
    pub tag_ids: Vec<String>,
    /// Explicit display order. Dense after a reorder, may have gaps after a
    /// delete.
    #[serde(default)]
    pub order: u32,
}

impl Epic {
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date: dates::format_project_date(start),
            end_date: dates::format_project_date(end),
            status: EpicStatus::NotStarted,
            tag_ids: Vec::new(),
            order: 0,
        }
    }

    pub fn start(&self) -> NaiveDate {
        dates::parse_date(&self.start_date)
    }

    pub fn end(&self) -> NaiveDate {
        dates::parse_date(&self.end_date)
    }

    /// Left edge and width of the epic's bar, both as window percentages.
    pub fn bar(&self, window: &ProjectWindow) -> (f64, f64) {
        let left = window.position(self.start());
        let right = window.position(self.end());
        (left, (right - left).max(0.0))
    }

    /// Tags referenced by this epic that still exist, in `tag_ids` order.
    pub fn resolve_tags<'a>(&self, tags: &'a [Tag]) -> Vec<&'a Tag> {
        self.tag_ids
            .iter()
            .filter_map(|id| tags.iter().find(|t| &t.id == id))
            .collect()
    }
}

/// Partial update applied by [`update_epic`]. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpicUpdate {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<EpicStatus>,
    pub tag_ids: Option<Vec<String>>,
}

impl EpicUpdate {
    fn apply(&self, epic: &mut Epic) {
        if let Some(name) = &self.name {
            epic.name = name.clone();
        }
        if let Some(start) = &self.start_date {
            epic.start_date = start.clone();
        }
        if let Some(end) = &self.end_date {
            epic.end_date = end.clone();
        }
        if let Some(status) = self.status {
            epic.status = status;
        }
        if let Some(tag_ids) = &self.tag_ids {
            epic.tag_ids = tag_ids.clone();
        }
    }
}

/// Append `epic` with `order` set to the current epic count.
pub fn add_epic(epics: &[Epic], mut epic: Epic) -> Vec<Epic> {
    epic.order = epics.len() as u32;
    let mut out = epics.to_vec();
    out.push(epic);
    out
}

/// Apply `update` to the epic with `id`. Unknown ids leave the list as is.
pub fn update_epic(epics: &[Epic], id: Uuid, update: &EpicUpdate) -> Vec<Epic> {
    epics
        .iter()
        .cloned()
        .map(|mut e| {
            if e.id == id {
                update.apply(&mut e);
            }
            e
        })
        .collect()
}

/// Remove the epic with `id`.
///
/// Remaining `order` values are not renumbered, so gaps can appear. Only
/// [`reorder_epics`] restores a dense ordering.
pub fn delete_epic(epics: &[Epic], id: Uuid) -> Vec<Epic> {
    epics.iter().filter(|e| e.id != id).cloned().collect()
}

/// Move the epic at `from` to `to`, then rewrite every `order` to its new
/// index.
///
/// An out-of-range `from` returns the list unchanged; `to` is clamped to the
/// last position.
pub fn reorder_epics(epics: &[Epic], from: usize, to: usize) -> Vec<Epic> {
    if from >= epics.len() {
        warn!("Reorder source index {} out of range ({} epics)", from, epics.len());
        return epics.to_vec();
    }
    let mut items = epics.to_vec();
    let moved = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, moved);
    for (index, epic) in items.iter_mut().enumerate() {
        epic.order = index as u32;
    }
    debug!("Moved epic from {} to {}", from, to);
    items
}

/// Epics sorted by `order`, ties kept in list order.
pub fn sorted_by_order(epics: &[Epic]) -> Vec<Epic> {
    let mut items = epics.to_vec();
    items.sort_by_key(|e| e.order);
    items
}
