//! Month-based project timeline planning.
//!
//! Projects hold epics: work phases with a date range, a status and tags.
//! The core maps dates onto a fixed-width month grid (`model::timeline`),
//! derives progress from epic statuses, keeps epic ordering dense across
//! reorders, and validates editor date ranges against the visible window.
//! Storage, import/export and rendering are layered on top.

pub mod app;
pub mod cli;
pub mod config;
pub mod dates;
pub mod editor;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod repo;
pub mod ui;

pub use app::{ImportMode, Planner, ProjectUpdate};
pub use dates::{format_project_date, parse_date, ProjectDate};
pub use editor::{validate_range, EpicDraft};
pub use error::{Error, ImportError, RangeError, RepoError, Result};
pub use model::progress::calculate_progress;
pub use model::timeline::{calculate_current_date_position, calculate_position};
pub use model::{Epic, EpicStatus, EpicUpdate, Project, ProjectList, ProjectWindow, Tag};
pub use repo::{JsonFileRepository, MemoryRepository, ProjectRepository};
