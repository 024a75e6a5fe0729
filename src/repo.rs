//! Project storage.
//!
//! The planner works on a [`ProjectList`] loaded from and written back to a
//! repository as a whole. Timeline calculations never touch storage.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::RepoError;
use crate::model::ProjectList;

pub type RepoResult<T> = Result<T, RepoError>;

/// Where the project list lives.
pub trait ProjectRepository {
    /// Load the stored list. An empty store yields an empty list.
    fn load(&self) -> RepoResult<ProjectList>;
    /// Replace the stored list.
    fn save(&mut self, list: &ProjectList) -> RepoResult<()>;
}

/// Repository kept in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    list: ProjectList,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(list: ProjectList) -> Self {
        Self { list }
    }
}

impl ProjectRepository for MemoryRepository {
    fn load(&self) -> RepoResult<ProjectList> {
        Ok(self.list.clone())
    }

    fn save(&mut self, list: &ProjectList) -> RepoResult<()> {
        self.list = list.clone();
        Ok(())
    }
}

/// Repository backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub const FILE_NAME: &'static str = "projects.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository at `<dir>/projects.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProjectRepository for JsonFileRepository {
    fn load(&self) -> RepoResult<ProjectList> {
        if !self.path.exists() {
            return Ok(ProjectList::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&mut self, list: &ProjectList) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(list)?;
        // written beside the target, then renamed over it
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        info!(
            "Saved {} projects to {}",
            list.projects.len(),
            self.path.display()
        );
        Ok(())
    }
}
