use chrono::NaiveDateTime;

use crate::model::ViewMode;

/// Typed notifications surfaced to the host, drained from
/// [`crate::ui::chart::GanttChart::show`] once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum GanttEvent {
    ViewChanged(ViewMode),
    DateChanged {
        task_id: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    ProgressChanged {
        task_id: String,
        progress: f32,
    },
    Clicked {
        task_id: String,
    },
}
