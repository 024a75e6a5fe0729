//! Validation and normalization of imported project files.
//!
//! Files written by older versions use snake_case keys and may omit
//! optional fields. Every key is looked up in both spellings and missing
//! optional values get defaults. The identity fields (`id`, the project
//! name, and an `epics` array) are mandatory.

use chrono::Utc;
use log::{info, warn};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::dates;
use crate::error::ImportError;
use crate::model::project::DEFAULT_MONTHS_TO_DISPLAY;
use crate::model::{Epic, EpicStatus, Project, Tag};

/// Look up `camel`, falling back to `snake`.
fn field<'a>(obj: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    obj.get(camel).or_else(|| obj.get(snake)).filter(|v| !v.is_null())
}

fn required_str(
    obj: &Map<String, Value>,
    camel: &'static str,
    snake: &str,
) -> Result<String, ImportError> {
    match field(obj, camel, snake) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) if camel == "id" => Ok(n.to_string()),
        _ => Err(ImportError::MissingField(camel)),
    }
}

fn optional_str(obj: &Map<String, Value>, camel: &str, snake: &str) -> Option<String> {
    field(obj, camel, snake).and_then(Value::as_str).map(str::to_string)
}

fn number(obj: &Map<String, Value>, camel: &'static str, snake: &str) -> Result<f64, ImportError> {
    match field(obj, camel, snake) {
        None => Ok(0.0),
        Some(v) => v.as_f64().ok_or_else(|| ImportError::InvalidField {
            field: camel,
            reason: format!("expected a number, found {v}"),
        }),
    }
}

fn count(obj: &Map<String, Value>, camel: &'static str, snake: &str) -> Result<u64, ImportError> {
    let n = number(obj, camel, snake)?;
    if n < 0.0 {
        return Err(ImportError::InvalidField {
            field: camel,
            reason: format!("expected a non-negative number, found {n}"),
        });
    }
    Ok(n.round() as u64)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn import_epic(index: usize, value: &Value) -> Result<Epic, ImportError> {
    let invalid = |reason: &str| ImportError::InvalidEpic {
        index,
        reason: reason.to_string(),
    };
    let obj = value.as_object().ok_or_else(|| invalid("not an object"))?;

    let name = match obj.get("name") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(invalid("missing name")),
    };
    let start_date = optional_str(obj, "startDate", "start_date")
        .ok_or_else(|| invalid("missing startDate"))?;
    let end_date =
        optional_str(obj, "endDate", "end_date").ok_or_else(|| invalid("missing endDate"))?;

    let status = match obj.get("status") {
        None | Some(Value::Null) => EpicStatus::NotStarted,
        Some(Value::String(s)) => EpicStatus::from_label(s)
            .ok_or_else(|| invalid(&format!("unknown status {s:?}")))?,
        Some(_) => return Err(invalid("status must be a string")),
    };

    let id = match obj.get("id").and_then(Value::as_str) {
        Some(raw) => Uuid::parse_str(raw).unwrap_or_else(|_| {
            warn!("Epic {:?} has non-UUID id {:?}; assigning a new one", name, raw);
            Uuid::new_v4()
        }),
        None => Uuid::new_v4(),
    };

    let order = obj
        .get("order")
        .and_then(Value::as_u64)
        .and_then(|o| u32::try_from(o).ok())
        .unwrap_or(index as u32);

    Ok(Epic {
        id,
        name,
        start_date,
        end_date,
        status,
        tag_ids: string_list(field(obj, "tagIds", "tag_ids")),
        order,
    })
}

fn import_tags(value: Option<&Value>) -> Vec<Tag> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| match serde_json::from_value::<Tag>(v.clone()) {
            Ok(tag) => Some(tag),
            Err(e) => {
                warn!("Skipping malformed tag {}: {}", v, e);
                None
            }
        })
        .collect()
}

/// Parse and validate a project file.
///
/// Either the whole project is returned or an [`ImportError`]; a partially
/// valid file never yields a project.
pub fn import_project(json: &str) -> Result<Project, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    import_project_value(&value)
}

/// Validate an already-parsed project document.
pub fn import_project_value(value: &Value) -> Result<Project, ImportError> {
    let obj = value.as_object().ok_or(ImportError::NotAnObject)?;

    let id = required_str(obj, "id", "id")?;
    let project_name = required_str(obj, "projectName", "project_name")?;
    let epics = match obj.get("epics") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| import_epic(i, v))
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(ImportError::MissingField("epics")),
    };

    let start_month = match optional_str(obj, "startMonth", "start_month") {
        Some(month) if dates::parse_month(&month).is_some() => month,
        Some(month) => {
            return Err(ImportError::InvalidField {
                field: "startMonth",
                reason: format!("unrecognized month {month:?}"),
            })
        }
        None => dates::format_month(dates::today()),
    };

    let months_to_display = match count(obj, "monthsToDisplay", "months_to_display")? {
        0 => DEFAULT_MONTHS_TO_DISPLAY,
        n => u32::try_from(n).map_err(|_| ImportError::InvalidField {
            field: "monthsToDisplay",
            reason: format!("{n} is too large"),
        })?,
    };

    let project_date = optional_str(obj, "projectDate", "project_date")
        .or_else(|| optional_str(obj, "currentDate", "current_date"))
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    let project = Project {
        id,
        project_name,
        total_estimated_hours: number(obj, "totalEstimatedHours", "total_estimated_hours")?,
        total_consumed_hours: number(obj, "totalConsumedHours", "total_consumed_hours")?,
        current_phase: optional_str(obj, "currentPhase", "current_phase").unwrap_or_default(),
        total_tasks: count(obj, "totalTasks", "total_tasks")?.min(u64::from(u32::MAX)) as u32,
        progress_status: count(obj, "progressStatus", "progress_status")?.min(100) as u8,
        start_month,
        months_to_display,
        project_date,
        epics,
        tags: import_tags(obj.get("tags")),
    };
    info!(
        "Imported project {:?} with {} epics and {} tags",
        project.project_name,
        project.epics.len(),
        project.tags.len()
    );
    Ok(project)
}
