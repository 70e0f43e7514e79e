//! An interactive Gantt timeline widget for egui.
//!
//! Hosts hand the chart raw project/task records, the chart normalizes
//! them onto a date scale and handles row packing, dependency arrows,
//! lateness projection bars, and drag editing of dates and progress.
//! Edits surface back to the host as [`GanttEvent`] notifications.

pub mod config;
pub mod event;
pub mod layout;
pub mod model;
pub mod ui;

pub use config::{CustomPopup, LeftMenu, Options};
pub use event::GanttEvent;
pub use model::{ProjectInput, Task, TaskInput, ViewMode};
pub use ui::GanttChart;
