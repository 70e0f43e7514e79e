use std::collections::HashMap;

use crate::model::{Project, Task};

/// Assign a display row to every task and record each project's row span.
///
/// Tasks must arrive in project order, and sorted by start date within a
/// project — the inline rule only inspects the immediately preceding task.
///
/// Non-inline mode gives every task its own row. Inline mode lets a task
/// reuse the preceding task's row when both belong to the same project and
/// the preceding bar's occupancy (whole days, end inclusive) has finished
/// before this one starts. Touching bars do not share a row.
///
/// Returns the total row count across all projects.
pub fn assign_rows(tasks: &mut [Task], projects: &mut [Project], inline: bool) -> usize {
    let mut spans: HashMap<String, (usize, usize)> = HashMap::new();
    let mut prev: Option<(String, chrono::NaiveDateTime, usize)> = None;
    let mut last_row = 0usize;

    for task in tasks.iter_mut() {
        let row = match &prev {
            None => 0,
            Some((project, prev_end, prev_row)) => {
                let fits = inline
                    && *project == task.project
                    && *prev_end + chrono::Duration::days(1) < task.start;
                if fits {
                    *prev_row
                } else {
                    prev_row + 1
                }
            }
        };
        task.row = row;
        last_row = last_row.max(row);
        spans
            .entry(task.project.clone())
            .and_modify(|(first, last)| {
                *first = (*first).min(row);
                *last = (*last).max(row);
            })
            .or_insert((row, row));
        prev = Some((task.project.clone(), task.end, row));
    }

    for project in projects.iter_mut() {
        if let Some(&(first, last)) = spans.get(&project.id) {
            project.first_row = first;
            project.last_row = last;
        }
    }

    if tasks.is_empty() {
        0
    } else {
        last_row + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{normalize_task, NormalizeContext, TaskInput};
    use chrono::NaiveDate;

    fn task(id: &str, project: &str, start: &str, end: &str) -> Task {
        let input = TaskInput {
            id: Some(id.to_owned()),
            name: id.to_owned(),
            start: Some(start.to_owned()),
            end: Some(end.to_owned()),
            ..Default::default()
        };
        let ctx = NormalizeContext {
            today: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_format: "%Y-%m-%d",
        };
        normalize_task(&input, project, ctx).expect("normalize")
    }

    #[test]
    fn flat_mode_gives_each_task_its_own_row() {
        let mut tasks = vec![
            task("a", "p", "2024-01-01", "2024-01-05"),
            task("b", "p", "2024-01-10", "2024-01-12"),
        ];
        let mut projects = vec![Project::new("p", "P")];
        let total = assign_rows(&mut tasks, &mut projects, false);
        assert_eq!(tasks[0].row, 0);
        assert_eq!(tasks[1].row, 1);
        assert_eq!(total, 2);
    }

    #[test]
    fn inline_keeps_touching_tasks_on_separate_rows() {
        // A(1/1–1/5), B(1/6–1/10), C(1/7–1/9): B touches A's occupancy
        // and C overlaps B, so no sharing happens.
        let mut tasks = vec![
            task("a", "p", "2024-01-01", "2024-01-05"),
            task("b", "p", "2024-01-06", "2024-01-10"),
            task("c", "p", "2024-01-07", "2024-01-09"),
        ];
        let mut projects = vec![Project::new("p", "P")];
        let total = assign_rows(&mut tasks, &mut projects, true);
        assert_eq!(
            tasks.iter().map(|t| t.row).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(total, 3);
    }

    #[test]
    fn inline_shares_row_after_a_clear_gap() {
        let mut tasks = vec![
            task("a", "p", "2024-01-01", "2024-01-05"),
            task("b", "p", "2024-01-08", "2024-01-10"),
        ];
        let mut projects = vec![Project::new("p", "P")];
        let total = assign_rows(&mut tasks, &mut projects, true);
        assert_eq!(tasks[0].row, 0);
        assert_eq!(tasks[1].row, 0);
        assert_eq!(total, 1);
    }

    #[test]
    fn inline_never_shares_across_projects() {
        let mut tasks = vec![
            task("a", "p1", "2024-01-01", "2024-01-05"),
            task("b", "p2", "2024-01-20", "2024-01-22"),
        ];
        let mut projects = vec![Project::new("p1", "P1"), Project::new("p2", "P2")];
        assign_rows(&mut tasks, &mut projects, true);
        assert_eq!(tasks[1].row, 1);
        assert_eq!(projects[0].first_row, 0);
        assert_eq!(projects[0].last_row, 0);
        assert_eq!(projects[1].first_row, 1);
        assert_eq!(projects[1].last_row, 1);
    }

    #[test]
    fn project_span_covers_first_and_last_rows() {
        let mut tasks = vec![
            task("a", "p", "2024-01-01", "2024-01-05"),
            task("b", "p", "2024-01-02", "2024-01-06"),
            task("c", "p", "2024-01-03", "2024-01-07"),
        ];
        let mut projects = vec![Project::new("p", "P")];
        assign_rows(&mut tasks, &mut projects, true);
        assert_eq!(projects[0].first_row, 0);
        assert_eq!(projects[0].last_row, 2);
        assert_eq!(projects[0].row_count(), 3);
    }

    #[test]
    fn empty_input_has_zero_rows() {
        let mut tasks: Vec<Task> = Vec::new();
        let mut projects = vec![Project::new("p", "P")];
        assert_eq!(assign_rows(&mut tasks, &mut projects, true), 0);
    }
}
