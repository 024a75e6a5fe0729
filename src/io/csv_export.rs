use crate::dates;
use crate::error::Error;
use crate::model::{epic, Project};
use std::path::Path;

/// Write the project's epics as semicolon-delimited CSV, in display order.
///
/// Columns: Epic ; Start Date ; End Date ; Status ; Tags
/// Dates are formatted as DD/MM/YYYY and tag names are comma-joined;
/// dangling tag ids are left out.
/// Returns the number of epics written.
pub fn write_csv<W: std::io::Write>(project: &Project, writer: W) -> Result<usize, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(["Epic", "Start Date", "End Date", "Status", "Tags"])?;

    let epics = epic::sorted_by_order(&project.epics);
    for e in &epics {
        let tags = e
            .resolve_tags(&project.tags)
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let start = dates::format_short_date(e.start());
        let end = dates::format_short_date(e.end());
        wtr.write_record([
            e.name.as_str(),
            start.as_str(),
            end.as_str(),
            e.status.label(),
            tags.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(epics.len())
}

/// Export the project's epics to a CSV file.
pub fn export_csv(project: &Project, path: &Path) -> Result<usize, Error> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(project, file)?;
    log::info!("Wrote {} epics to {}", written, path.display());
    Ok(written)
}
