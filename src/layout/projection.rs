use chrono::NaiveDateTime;

use crate::model::{Project, Task};

/// Derive a project's schedule slippage from its `current` task and, when
/// it is running late, synthesize a non-interactive projection bar after
/// the project's last task.
///
/// The expected-progress date is `start + duration × progress/100`, with
/// the duration counted in whole days (end inclusive). Lateness is the day
/// distance from that date to now; a lateness of N > 0 yields a bar
/// spanning `[last+1d, last+Nd]` on the project's last row.
pub fn compute_projection(
    project: &mut Project,
    tasks: &[Task],
    now: NaiveDateTime,
) -> Option<Task> {
    let members: Vec<&Task> = tasks.iter().filter(|t| t.project == project.id).collect();
    let current = members.iter().find(|t| t.current && !t.is_projection)?;

    let total_hours = (current.end - current.start).num_hours() + 24;
    let progress_hours = (total_hours as f64 * current.progress as f64 / 100.0) as i64;
    let progress_date = current.start + chrono::Duration::hours(progress_hours);
    let lateness = (now.date() - progress_date.date()).num_days();
    project.lateness_days = lateness.max(0);

    if lateness <= 0 {
        return None;
    }

    let last_date = members.iter().map(|t| t.end).max()?;
    let mut bar = (*current).clone();
    bar.id = format!("{}-projection", project.id);
    bar.name = format!("{} +{}d", project.name, lateness);
    bar.start = last_date + chrono::Duration::days(1);
    bar.end = last_date + chrono::Duration::days(lateness);
    bar.progress = 0.0;
    bar.dependencies = Vec::new();
    bar.row = project.last_row;
    bar.invalid = false;
    bar.is_group = false;
    bar.is_projection = true;
    bar.current = false;
    Some(bar)
}
