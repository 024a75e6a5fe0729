use super::epic::Epic;

/// Aggregate completion percentage of a project.
///
/// Completed and in-progress epics both count as done; an empty list is 0%.
pub fn calculate_progress(epics: &[Epic]) -> u8 {
    if epics.is_empty() {
        return 0;
    }
    let done = epics
        .iter()
        .filter(|e| e.status.counts_as_progress())
        .count();
    let progress = (done as f64 / epics.len() as f64 * 100.0).round();
    progress.clamp(0.0, 100.0) as u8
}

/// Share of the estimated hours already consumed, capped at 100%.
///
/// A zero, negative, or non-finite estimate yields 0.
pub fn hours_consumed_percentage(consumed: f64, estimated: f64) -> u8 {
    if !estimated.is_finite() || estimated <= 0.0 || !consumed.is_finite() {
        return 0;
    }
    let pct = (consumed / estimated * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
