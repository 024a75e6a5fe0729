use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label attached to epics. `color` is a palette token understood by the
/// rendering layer ("blue", "emerald", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Find a tag by name, case-insensitively.
pub fn find_by_name<'a>(tags: &'a [Tag], name: &str) -> Option<&'a Tag> {
    let name = name.trim();
    tags.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}
