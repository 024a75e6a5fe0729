pub mod epic;
pub mod progress;
pub mod project;
pub mod tag;
pub mod timeline;

pub use epic::{Epic, EpicStatus, EpicUpdate};
pub use project::{Project, ProjectList};
pub use tag::Tag;
pub use timeline::{MonthLabel, ProjectWindow};
