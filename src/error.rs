use thiserror::Error;

/// Why the epic editor rejected a candidate date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("the start date cannot be after the end date")]
    InvalidRange,

    #[error("dates must fall within the project timeline")]
    OutOfWindow,
}

/// Why a project file could not be imported. No project is created when
/// any of these is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("project file must contain a JSON object")]
    NotAnObject,

    #[error("project file is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid epic at index {index}: {reason}")]
    InvalidEpic { index: usize, reason: String },
}

/// Storage failures from a project repository.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("project not found: {0}")]
    NotFound(String),
}

/// Library-level error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no project selected")]
    NoProjectSelected,

    #[error("epic not found: {0}")]
    EpicNotFound(uuid::Uuid),

    #[error("invalid timeline window: {0}")]
    InvalidWindow(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
