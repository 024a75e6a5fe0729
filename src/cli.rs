//! Command-line interface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::app::{ImportMode, Planner, ProjectUpdate};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::io;
use crate::model::{tag, Project};
use crate::repo::{JsonFileRepository, ProjectRepository};
use crate::{dates, ui};

/// Plan projects as epics on a month-based timeline.
#[derive(Parser, Debug)]
#[command(name = "epic-timeline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project list file (defaults to projects.json in the data directory)
    #[arg(short, long, global = true, env = "EPIC_TIMELINE_FILE")]
    pub file: Option<PathBuf>,

    /// Settings file (defaults to the OS config directory)
    #[arg(long, global = true, env = "EPIC_TIMELINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List projects; the selected one is starred
    List,

    /// Create a project and select it
    New {
        name: String,
        /// First displayed month, e.g. "enero 2024" (defaults to this month)
        #[arg(long)]
        start_month: Option<String>,
        /// Number of months to display
        #[arg(long)]
        months: Option<u32>,
    },

    /// Select a project by id
    Select { id: String },

    /// Edit the selected project's settings
    Settings {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        estimated_hours: Option<f64>,
        #[arg(long)]
        consumed_hours: Option<f64>,
        #[arg(long)]
        phase: Option<String>,
        #[arg(long)]
        tasks: Option<u32>,
        #[arg(long)]
        start_month: Option<String>,
        #[arg(long)]
        months: Option<u32>,
    },

    /// Print the selected project's timeline
    Show {
        /// Width of the timeline grid in characters
        #[arg(long, default_value_t = 56)]
        width: usize,
    },

    /// Import a project JSON file
    Import {
        path: PathBuf,
        /// Replace the project with the same id instead of adding a copy
        #[arg(long)]
        replace: bool,
    },

    /// Export the selected project as JSON
    Export {
        /// Output path (defaults to a name derived from the project)
        path: Option<PathBuf>,
    },

    /// Export the selected project's epics as CSV
    ExportCsv { path: PathBuf },

    /// Append epics from a CSV file
    ImportCsv { path: PathBuf },

    /// Add an epic to the selected project
    AddEpic {
        name: String,
        /// Start date ("15 de enero 2024" or 2024-01-15)
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Tag name; repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an epic's name or dates
    EditEpic {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },

    /// Move the epic at display position FROM to TO (0-based)
    Move { from: usize, to: usize },

    /// Advance an epic to its next status
    Status { id: Uuid },

    /// Delete an epic
    DeleteEpic { id: Uuid },

    /// Add a tag to the selected project
    Tag { name: String, color: String },
}

fn parse_arg_date(s: &str) -> Result<NaiveDate> {
    dates::try_parse_date(s)
        .or_else(|| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .ok_or_else(|| Error::Other(format!("unrecognized date {s:?}")))
}

fn selected<R: ProjectRepository>(planner: &Planner<R>) -> Result<&Project> {
    planner.selected().ok_or(Error::NoProjectSelected)
}

/// Execute a parsed command against the file repository.
pub fn run(cli: Cli, settings: &Settings) -> Result<()> {
    let repo = match &cli.file {
        Some(path) => JsonFileRepository::new(path),
        None => JsonFileRepository::in_dir(&settings.data_dir()),
    };
    let mut planner = Planner::new(repo)?;
    execute(&mut planner, settings, cli.command)
}

/// Execute one command against `planner`.
pub fn execute<R: ProjectRepository>(
    planner: &mut Planner<R>,
    settings: &Settings,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::List => {
            let selected = planner.selected().map(|p| p.id.clone());
            for p in planner.projects() {
                let mark = if Some(&p.id) == selected.as_ref() { '*' } else { ' ' };
                println!(
                    "{} {}  {}  {} · {} meses · {}%",
                    mark,
                    p.id,
                    p.project_name,
                    p.start_month,
                    p.months_to_display,
                    p.progress_status
                );
            }
        }
        Commands::New {
            name,
            start_month,
            months,
        } => {
            let start_month =
                start_month.unwrap_or_else(|| dates::format_month(dates::today()));
            let months = months.unwrap_or(settings.default_months_to_display);
            let project = planner.create_project(&name, &start_month, months)?;
            println!("{}", project.id);
        }
        Commands::Select { id } => planner.select(&id)?,
        Commands::Settings {
            name,
            estimated_hours,
            consumed_hours,
            phase,
            tasks,
            start_month,
            months,
        } => {
            planner.update_settings(&ProjectUpdate {
                project_name: name,
                total_estimated_hours: estimated_hours,
                total_consumed_hours: consumed_hours,
                current_phase: phase,
                total_tasks: tasks,
                progress_status: None,
                start_month,
                months_to_display: months,
            })?;
        }
        Commands::Show { width } => {
            let project = selected(planner)?;
            let text = ui::text_chart::show_timeline(project, dates::today(), width)
                .ok_or_else(|| {
                    Error::InvalidWindow(format!(
                        "{:?} x {} months",
                        project.start_month, project.months_to_display
                    ))
                })?;
            println!("{text}");
        }
        Commands::Import { path, replace } => {
            let json = std::fs::read_to_string(&path)?;
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::AsNew
            };
            let id = planner.import_project(&json, mode)?;
            println!("{id}");
        }
        Commands::Export { path } => {
            let project = selected(planner)?;
            let path = path.unwrap_or_else(|| PathBuf::from(io::export_file_name(project)));
            io::save_project(project, &path)?;
            println!("{}", path.display());
        }
        Commands::ExportCsv { path } => {
            let written = io::csv_export::export_csv(selected(planner)?, &path)?;
            println!("{written} epics written to {}", path.display());
        }
        Commands::ImportCsv { path } => {
            let content = std::fs::read_to_string(&path)?;
            let skipped = planner.import_csv(&content)?;
            if skipped > 0 {
                println!("{skipped} rows skipped");
            }
        }
        Commands::AddEpic {
            name,
            start,
            end,
            tags,
        } => {
            let (start, end) = (parse_arg_date(&start)?, parse_arg_date(&end)?);
            let project_tags = selected(planner)?.tags.clone();
            let mut draft = planner.new_epic_draft()?;
            draft.name = name;
            draft.tag_ids = tags
                .iter()
                .filter_map(|t| tag::find_by_name(&project_tags, t).map(|t| t.id.clone()))
                .collect();
            draft.set_range(start, end)?;
            let id = planner.add_epic_from_draft(&mut draft)?;
            println!("{id}");
        }
        Commands::EditEpic {
            id,
            name,
            start,
            end,
        } => {
            let mut draft = planner.edit_epic_draft(id)?;
            if let Some(name) = name {
                draft.name = name;
            }
            match (start, end) {
                (Some(s), Some(e)) => draft.set_range(parse_arg_date(&s)?, parse_arg_date(&e)?)?,
                (Some(s), None) => draft.set_start_date(parse_arg_date(&s)?)?,
                (None, Some(e)) => draft.set_end_date(parse_arg_date(&e)?)?,
                (None, None) => {}
            }
            planner.apply_draft(id, &mut draft)?;
        }
        Commands::Move { from, to } => planner.reorder_epics(from, to)?,
        Commands::Status { id } => {
            planner.cycle_epic_status(id)?;
            if let Some(e) = selected(planner)?.epic(id) {
                println!("{}", e.status);
            }
        }
        Commands::DeleteEpic { id } => planner.delete_epic(id)?,
        Commands::Tag { name, color } => {
            let id = planner.add_tag(&name, &color)?;
            println!("{id}");
        }
    }
    Ok(())
}
