//! User settings, persisted in the OS config directory.

use std::path::{Path, PathBuf};

use log::warn;

use crate::model::project::DEFAULT_MONTHS_TO_DISPLAY;

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window length for newly created projects.
    pub default_months_to_display: u32,
    pub log_level: String,
    /// Overrides the platform data directory for `projects.json`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_months_to_display: DEFAULT_MONTHS_TO_DISPLAY,
            log_level: "info".into(),
            data_dir: None,
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "EpicTimeline")
}

impl Settings {
    /// Default location of `settings.json`.
    pub fn default_path() -> PathBuf {
        match project_dirs() {
            Some(dirs) => dirs.config_dir().join("settings.json"),
            None => PathBuf::from(".").join("settings.json"),
        }
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn try_load(path: &Path) -> crate::error::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Read settings from `path`, using defaults when the file is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        Self::try_load(path).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Directory holding `projects.json`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match project_dirs() {
            Some(dirs) => dirs.data_dir().to_path_buf(),
            None => PathBuf::from("."),
        }
    }
}
