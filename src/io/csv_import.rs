use std::path::Path;

use chrono::NaiveDate;
use log::warn;

use crate::dates;
use crate::error::Error;
use crate::model::{epic, tag, Epic, EpicStatus, Tag};

/// Try the project date forms first, then common numeric formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Some(d) = dates::try_parse_date(s) {
        return Some(d);
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Start,
    End,
    Status,
    Tags,
}

/// Map a header cell to a column, ignoring case, spacing and punctuation.
fn header_to_col(header: &str) -> Option<Column> {
    let normalized = header.trim().to_lowercase().replace([' ', '-', '_'], "");
    match normalized.as_str() {
        "epic" | "épica" | "epica" | "name" | "nombre" | "task" | "title" | "phase" => {
            Some(Column::Name)
        }
        "start" | "startdate" | "inicio" | "fechadeinicio" | "from" | "begin" => {
            Some(Column::Start)
        }
        "end" | "enddate" | "fin" | "término" | "fechadetérmino" | "to" | "finish" | "due" => {
            Some(Column::End)
        }
        "status" | "estado" | "state" => Some(Column::Status),
        "tags" | "etiquetas" | "labels" => Some(Column::Tags),
        _ => None,
    }
}

/// Append epics parsed from CSV text to `existing`.
///
/// Auto-detects the delimiter and matches headers flexibly. Rows without a
/// name or with unreadable dates are skipped. Tags are matched by name
/// against `tags`; unknown names are ignored.
/// Returns `(epics, skipped_count)` where `epics` is the full new list.
pub fn import_csv(content: &str, existing: &[Epic], tags: &[Tag]) -> Result<(Vec<Epic>, usize), Error> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers.iter().map(header_to_col).collect();

    let has = |c: Column| col_map.iter().any(|m| *m == Some(c));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        let found: Vec<&str> = headers.iter().collect();
        return Err(Error::InvalidCsv(format!(
            "missing required columns. Found headers: {:?}. \
             Need columns for: epic name, start date, end date.",
            found
        )));
    }

    let mut epics = existing.to_vec();
    let mut added = 0usize;
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping CSV row {}: {}", row, e);
                skipped += 1;
                continue;
            }
        };

        let cell = |c: Column| {
            col_map
                .iter()
                .position(|m| *m == Some(c))
                .and_then(|idx| record.get(idx))
                .unwrap_or("")
        };

        let name = cell(Column::Name);
        if name.is_empty() {
            skipped += 1;
            continue;
        }
        let Some(start) = parse_date(cell(Column::Start)) else {
            warn!("Skipping row {}: invalid start date '{}'", row, cell(Column::Start));
            skipped += 1;
            continue;
        };
        let Some(end) = parse_date(cell(Column::End)) else {
            warn!("Skipping row {}: invalid end date '{}'", row, cell(Column::End));
            skipped += 1;
            continue;
        };

        let mut new_epic = Epic::new(name, start, end.max(start));
        new_epic.status = EpicStatus::from_label(cell(Column::Status)).unwrap_or_default();
        new_epic.tag_ids = cell(Column::Tags)
            .split([',', '|'])
            .filter(|s| !s.trim().is_empty())
            .filter_map(|s| match tag::find_by_name(tags, s) {
                Some(t) => Some(t.id.clone()),
                None => {
                    warn!("Row {}: unknown tag '{}'", row, s.trim());
                    None
                }
            })
            .collect();

        epics = epic::add_epic(&epics, new_epic);
        added += 1;
    }

    if added == 0 && skipped > 0 {
        return Err(Error::InvalidCsv(format!(
            "no valid epics found ({} rows skipped)",
            skipped
        )));
    }
    if added == 0 {
        return Err(Error::InvalidCsv("file is empty or has no data rows".to_string()));
    }

    Ok((epics, skipped))
}

/// Read a CSV file and append its epics to `existing`.
pub fn import_csv_file(path: &Path, existing: &[Epic], tags: &[Tag]) -> Result<(Vec<Epic>, usize), Error> {
    let content = std::fs::read_to_string(path)?;
    import_csv(&content, existing, tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_delimiters() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
    }

    #[test]
    fn imports_rows_after_existing_epics() {
        let tags = vec![Tag::new("Backend", "blue")];
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let existing = vec![Epic::new("Kickoff", d, d)];
        let csv = "Epic,Start Date,End Date,Status,Tags\n\
                   Diseño,2024-01-05,2024-01-20,En Progreso,backend\n\
                   Sin fecha,,2024-02-01,,\n\
                   Build,1 de febrero 2024,15/02/2024,done,Backend|Ops\n";
        let (epics, skipped) = import_csv(csv, &existing, &tags).unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(epics.len(), 3);
        assert_eq!(epics[1].name, "Diseño");
        assert_eq!(epics[1].order, 1);
        assert_eq!(epics[1].status, EpicStatus::InProgress);
        assert_eq!(epics[1].tag_ids, vec![tags[0].id.clone()]);
        assert_eq!(epics[1].start_date, "5 de enero 2024");
        assert_eq!(epics[2].order, 2);
        assert_eq!(epics[2].status, EpicStatus::Completed);
        assert_eq!(epics[2].end_date, "15 de febrero 2024");
    }

    #[test]
    fn inverted_dates_collapse_to_start() {
        let csv = "name;start;end\nA;2024-03-10;2024-03-01\n";
        let (epics, _) = import_csv(csv, &[], &[]).unwrap();
        assert_eq!(epics[0].start_date, epics[0].end_date);
    }

    #[test]
    fn requires_core_columns() {
        let err = import_csv("name;start\nA;2024-01-01\n", &[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidCsv(_)));
        let err = import_csv("name;start;end\n", &[], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidCsv(_)));
    }
}
