//! Plain-text rendering of a project timeline.
//!
//! Every horizontal placement comes from [`ProjectWindow`] percentages, so
//! the text chart lines up with any other renderer using the same core.

use chrono::NaiveDate;

use crate::dates;
use crate::model::{epic, Project, ProjectWindow};

const NAME_WIDTH: usize = 22;
const BAR_FILL: char = '█';
const BAR_EMPTY: char = '·';
const TODAY_LINE: char = '┆';
const TODAY_HEAD: char = '▼';

/// Column for a percentage on a grid of `width` cells.
fn column(position: f64, width: usize) -> usize {
    let last = width.saturating_sub(1) as f64;
    ((position / 100.0) * last).round() as usize
}

fn fit(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn draw_timeline_header(window: &ProjectWindow, width: usize) -> String {
    let mut cells = vec![' '; width];
    let months = window.months();
    let count = months.len().max(1);
    for (i, month) in months.iter().enumerate() {
        let start = column(100.0 * i as f64 / count as f64, width);
        let end = column(100.0 * (i + 1) as f64 / count as f64, width);
        for (offset, ch) in month.label.chars().enumerate() {
            let at = start + offset;
            if at >= end.max(start + 1) || at >= width {
                break;
            }
            cells[at] = ch;
        }
    }
    format!("{} {}", fit("", NAME_WIDTH), cells.into_iter().collect::<String>())
}

fn draw_today_line(marker: Option<usize>, width: usize) -> Option<String> {
    let col = marker?;
    let mut cells = vec![' '; width];
    cells[col.min(width - 1)] = TODAY_HEAD;
    Some(format!("{} {}", fit("hoy", NAME_WIDTH), cells.into_iter().collect::<String>()))
}

fn draw_epic_bar(left: f64, width_pct: f64, marker: Option<usize>, width: usize) -> String {
    let from = column(left, width);
    let to = column(left + width_pct, width);
    (0..width)
        .map(|c| {
            if c >= from && c <= to {
                BAR_FILL
            } else if Some(c) == marker {
                TODAY_LINE
            } else {
                BAR_EMPTY
            }
        })
        .collect()
}

/// Render the project's timeline as text, `width` cells wide.
///
/// Returns `None` when the project's window is invalid.
pub fn show_timeline(project: &Project, today: NaiveDate, width: usize) -> Option<String> {
    let window = project.window()?;
    let width = width.max(10);
    let marker_pos = window.current_date_position(today);
    let marker = (marker_pos >= 0.0).then(|| column(marker_pos, width));

    let mut lines = vec![
        format!(
            "{} · {} ({} meses desde {})",
            project.project_name,
            project.current_phase,
            project.months_to_display,
            project.start_month
        ),
        draw_timeline_header(&window, width),
    ];
    if let Some(line) = draw_today_line(marker, width) {
        lines.push(line);
    }

    for e in epic::sorted_by_order(&project.epics) {
        let (left, bar_width) = e.bar(&window);
        let tags = e
            .resolve_tags(&project.tags)
            .iter()
            .map(|t| format!("#{}", t.name))
            .collect::<Vec<_>>()
            .join(" ");
        let mut line = format!(
            "{} {} {} {}–{}",
            fit(&e.name, NAME_WIDTH),
            draw_epic_bar(left, bar_width, marker, width),
            e.status,
            dates::format_short_date(e.start()),
            dates::format_short_date(e.end()),
        );
        if !tags.is_empty() {
            line.push(' ');
            line.push_str(&tags);
        }
        lines.push(line);
    }

    lines.push(format!(
        "Progreso {}% · Horas {}/{} ({}%) · Tareas {}",
        project.derived_progress(),
        project.total_consumed_hours,
        project.total_estimated_hours,
        project.hours_consumed_percentage(),
        project.total_tasks
    ));
    Some(lines.join("\n"))
}
