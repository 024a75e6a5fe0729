use log::info;
use uuid::Uuid;

use crate::editor::EpicDraft;
use crate::error::{Error, Result};
use crate::io;
use crate::model::{epic, Epic, EpicUpdate, Project, ProjectList, ProjectWindow, Tag};
use crate::repo::ProjectRepository;

/// How an imported project is merged into the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Add alongside existing projects; a clashing id is replaced by a
    /// fresh one.
    AsNew,
    /// Replace the project with the same id, or add it when none matches.
    Replace,
}

/// Editable project settings. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub project_name: Option<String>,
    pub total_estimated_hours: Option<f64>,
    pub total_consumed_hours: Option<f64>,
    pub current_phase: Option<String>,
    pub total_tasks: Option<u32>,
    pub progress_status: Option<u8>,
    pub start_month: Option<String>,
    pub months_to_display: Option<u32>,
}

/// Project planner service: the project list plus the repository it is
/// persisted to. Every change is written through immediately.
pub struct Planner<R: ProjectRepository> {
    repo: R,
    list: ProjectList,
}

impl<R: ProjectRepository> Planner<R> {
    pub fn new(repo: R) -> Result<Self> {
        let list = repo.load()?;
        Ok(Self { repo, list })
    }

    pub fn projects(&self) -> &[Project] {
        &self.list.projects
    }

    pub fn selected(&self) -> Option<&Project> {
        self.list.selected()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.list.projects.iter().any(|p| p.id == id) {
            return Err(crate::error::RepoError::NotFound(id.to_string()).into());
        }
        let mut list = self.list.clone();
        list.selected_project_id = Some(id.to_string());
        self.commit(list)
    }

    /// Create a project, select it, and return it.
    pub fn create_project(
        &mut self,
        name: &str,
        start_month: &str,
        months_to_display: u32,
    ) -> Result<&Project> {
        let window = ProjectWindow::new(start_month, months_to_display).ok_or_else(|| {
            Error::InvalidWindow(format!("{start_month:?} x {months_to_display} months"))
        })?;
        let mut project = Project::new(name);
        project.start_month = window.start_month();
        project.months_to_display = months_to_display;
        let id = project.id.clone();
        let mut list = self.list.clone();
        list.projects.push(project);
        list.selected_project_id = Some(id.clone());
        self.commit(list)?;
        info!("Created project {:?} ({})", name, id);
        self.selected().ok_or(Error::NoProjectSelected)
    }

    pub fn delete_project(&mut self, id: &str) -> Result<()> {
        let mut list = self.list.clone();
        list.projects.retain(|p| p.id != id);
        if list.projects.len() == self.list.projects.len() {
            return Err(crate::error::RepoError::NotFound(id.to_string()).into());
        }
        if list.selected_project_id.as_deref() == Some(id) {
            list.selected_project_id = list.projects.first().map(|p| p.id.clone());
        }
        self.commit(list)
    }

    /// Apply a settings edit to the selected project.
    pub fn update_settings(&mut self, update: &ProjectUpdate) -> Result<()> {
        self.modify_selected(|project| {
            let start_month = update.start_month.as_deref().unwrap_or(&project.start_month);
            let months = update.months_to_display.unwrap_or(project.months_to_display);
            let window = ProjectWindow::new(start_month, months).ok_or_else(|| {
                Error::InvalidWindow(format!("{start_month:?} x {months} months"))
            })?;
            project.start_month = window.start_month();
            project.months_to_display = months;
            if let Some(name) = &update.project_name {
                project.project_name = name.clone();
            }
            if let Some(hours) = update.total_estimated_hours {
                project.total_estimated_hours = hours;
            }
            if let Some(hours) = update.total_consumed_hours {
                project.total_consumed_hours = hours;
            }
            if let Some(phase) = &update.current_phase {
                project.current_phase = phase.clone();
            }
            if let Some(tasks) = update.total_tasks {
                project.total_tasks = tasks;
            }
            if let Some(progress) = update.progress_status {
                project.progress_status = progress.min(100);
            }
            Ok(())
        })
    }

    // ── Epics ───────────────────────────────────────────────────

    /// Editor draft for a new epic in the selected project.
    pub fn new_epic_draft(&self) -> Result<EpicDraft> {
        let project = self.selected().ok_or(Error::NoProjectSelected)?;
        Ok(EpicDraft::new_epic(
            Self::window_of(project)?,
            project.epics.len(),
            crate::dates::today(),
        ))
    }

    /// Editor draft for an existing epic.
    pub fn edit_epic_draft(&self, id: Uuid) -> Result<EpicDraft> {
        let project = self.selected().ok_or(Error::NoProjectSelected)?;
        let epic = project.epic(id).ok_or(Error::EpicNotFound(id))?;
        Ok(EpicDraft::from_epic(epic, Self::window_of(project)?))
    }

    /// Commit a new-epic draft, appending the epic. Returns its id.
    pub fn add_epic_from_draft(&mut self, draft: &mut EpicDraft) -> Result<Uuid> {
        let update = draft.commit()?;
        let mut new_epic = Epic::new(draft.name.clone(), draft.start_date(), draft.end_date());
        new_epic.tag_ids = update.tag_ids.unwrap_or_default();
        self.add_epic(new_epic)
    }

    /// Commit an edit draft to the epic with `id`.
    pub fn apply_draft(&mut self, id: Uuid, draft: &mut EpicDraft) -> Result<()> {
        let update = draft.commit()?;
        self.update_epic(id, &update)
    }

    /// Append an epic to the selected project. Returns its id.
    pub fn add_epic(&mut self, new_epic: Epic) -> Result<Uuid> {
        let id = new_epic.id;
        self.modify_epics(|epics| Ok(epic::add_epic(epics, new_epic)))?;
        Ok(id)
    }

    pub fn update_epic(&mut self, id: Uuid, update: &EpicUpdate) -> Result<()> {
        self.modify_epics(|epics| {
            if !epics.iter().any(|e| e.id == id) {
                return Err(Error::EpicNotFound(id));
            }
            Ok(epic::update_epic(epics, id, update))
        })
    }

    /// Delete an epic. Remaining order values keep their gaps.
    pub fn delete_epic(&mut self, id: Uuid) -> Result<()> {
        self.modify_epics(|epics| {
            if !epics.iter().any(|e| e.id == id) {
                return Err(Error::EpicNotFound(id));
            }
            Ok(epic::delete_epic(epics, id))
        })
    }

    /// Move the epic at display index `from` to `to`.
    pub fn reorder_epics(&mut self, from: usize, to: usize) -> Result<()> {
        self.modify_epics(|epics| Ok(epic::reorder_epics(&epic::sorted_by_order(epics), from, to)))
    }

    /// Advance an epic to its next status.
    pub fn cycle_epic_status(&mut self, id: Uuid) -> Result<()> {
        let project = self.selected().ok_or(Error::NoProjectSelected)?;
        let status = project.epic(id).ok_or(Error::EpicNotFound(id))?.status;
        let update = EpicUpdate {
            status: Some(status.next()),
            ..Default::default()
        };
        self.update_epic(id, &update)
    }

    // ── Tags ────────────────────────────────────────────────────

    pub fn add_tag(&mut self, name: &str, color: &str) -> Result<String> {
        let tag = Tag::new(name, color);
        let id = tag.id.clone();
        self.modify_selected(|project| {
            project.tags.push(tag);
            Ok(())
        })?;
        Ok(id)
    }

    /// Remove a tag and detach it from every epic.
    pub fn delete_tag(&mut self, id: &str) -> Result<()> {
        self.modify_selected(|project| {
            project.tags.retain(|t| t.id != id);
            for e in &mut project.epics {
                e.tag_ids.retain(|t| t != id);
            }
            Ok(())
        })
    }

    // ── Import / export ─────────────────────────────────────────

    /// Whether an imported project clashes with an existing one by id or
    /// name.
    pub fn has_conflict(&self, incoming: &Project) -> bool {
        self.list
            .projects
            .iter()
            .any(|p| p.id == incoming.id || p.project_name == incoming.project_name)
    }

    /// Validate a project file and merge it into the list. The imported
    /// project becomes the selection. Returns its id.
    pub fn import_project(&mut self, json: &str, mode: ImportMode) -> Result<String> {
        let mut project = io::import_project(json)?;
        let mut list = self.list.clone();
        let existing = list.projects.iter().position(|p| p.id == project.id);
        match (mode, existing) {
            (ImportMode::Replace, Some(index)) => {
                list.projects[index] = project.clone();
            }
            (ImportMode::AsNew, Some(_)) => {
                project.id = Uuid::new_v4().to_string();
                list.projects.push(project.clone());
            }
            (_, None) => list.projects.push(project.clone()),
        }
        list.selected_project_id = Some(project.id.clone());
        self.commit(list)?;
        info!("Imported {:?} as {}", project.project_name, project.id);
        Ok(project.id)
    }

    /// The selected project as export JSON.
    pub fn export_selected(&self) -> Result<String> {
        let project = self.selected().ok_or(Error::NoProjectSelected)?;
        Ok(io::export_project_json(project)?)
    }

    /// Append epics from CSV text to the selected project. Returns the
    /// number of skipped rows.
    pub fn import_csv(&mut self, content: &str) -> Result<usize> {
        let mut skipped = 0;
        self.modify_selected(|project| {
            let (epics, s) = io::csv_import::import_csv(content, &project.epics, &project.tags)?;
            project.epics = epics;
            project.refresh_progress();
            skipped = s;
            Ok(())
        })?;
        Ok(skipped)
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn window_of(project: &Project) -> Result<ProjectWindow> {
        project.window().ok_or_else(|| {
            Error::InvalidWindow(format!(
                "{:?} x {} months",
                project.start_month, project.months_to_display
            ))
        })
    }

    /// Run `f` on a copy of the selected project and keep the result only
    /// if `f` succeeds and the list is saved.
    fn modify_selected<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Project) -> Result<()>,
    {
        let id = self
            .list
            .selected_project_id
            .clone()
            .ok_or(Error::NoProjectSelected)?;
        let index = self
            .list
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::NoProjectSelected)?;
        let mut list = self.list.clone();
        f(&mut list.projects[index])?;
        self.commit(list)
    }

    /// Replace the selected project's epics and refresh its progress.
    fn modify_epics<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&[Epic]) -> Result<Vec<Epic>>,
    {
        self.modify_selected(|project| {
            project.epics = f(&project.epics)?;
            project.refresh_progress();
            Ok(())
        })
    }

    /// Save `list` and make it current. On a failed save the previous
    /// list stays in place.
    fn commit(&mut self, list: ProjectList) -> Result<()> {
        self.repo.save(&list)?;
        self.list = list;
        Ok(())
    }
}
