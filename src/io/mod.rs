pub mod csv_export;
pub mod csv_import;
pub mod file;
pub mod import;

pub use file::{export_file_name, export_project_json, load_project, save_project};
pub use import::{import_project, import_project_value};
