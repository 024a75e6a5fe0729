use crate::error::Error;
use crate::io::import;
use crate::model::Project;
use std::path::Path;

/// Serialize a project for export. `tagIds` and `tags` are always present,
/// even when empty.
pub fn export_project_json(project: &Project) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(project)
}

/// Save a project to a JSON file.
pub fn save_project(project: &Project, path: &Path) -> Result<(), Error> {
    let json = export_project_json(project)?;
    std::fs::write(path, json)?;
    log::info!("Exported project {:?} to {}", project.project_name, path.display());
    Ok(())
}

/// Load and validate a project from a JSON file.
pub fn load_project(path: &Path) -> Result<Project, Error> {
    let json = std::fs::read_to_string(path)?;
    Ok(import::import_project(&json)?)
}

/// Suggested export file name: lowercase, whitespace runs replaced by `-`.
pub fn export_file_name(project: &Project) -> String {
    let slug = project
        .project_name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{slug}.json")
}
