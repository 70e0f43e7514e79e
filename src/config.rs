use std::fmt;
use std::sync::Arc;

use crate::model::{Task, ViewMode};

/// Width of the project label column when it is shown.
pub const LEFT_MENU_WIDTH: f32 = 200.0;

/// Detail popover content override.
#[derive(Clone)]
pub enum CustomPopup {
    /// One fixed block of text for every task.
    Static(String),
    /// Per-task formatter.
    PerTask(Arc<dyn Fn(&Task) -> String + Send + Sync>),
}

impl fmt::Debug for CustomPopup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomPopup::Static(s) => f.debug_tuple("Static").field(s).finish(),
            CustomPopup::PerTask(_) => f.write_str("PerTask(..)"),
        }
    }
}

/// Project label column sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeftMenu {
    /// 200 px when more than one project is shown, hidden otherwise.
    Auto,
    Fixed(f32),
}

/// Host-facing configuration, mirrored from the recognized input options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Overrides the width the chart lays itself out against.
    pub screen_width: Option<f32>,
    pub header_height: f32,
    pub column_width: Option<f32>,
    /// Hour step override for sub-month modes.
    pub step_hours: Option<i64>,
    /// View modes offered to the user, in toolbar order.
    pub view_modes: Vec<ViewMode>,
    pub view_mode: ViewMode,
    pub bar_height: f32,
    /// Vertical padding around each bar row.
    pub padding: f32,
    /// Enables drag/resize/progress interactions.
    pub edit_mode: bool,
    pub date_format: String,
    pub custom_popup: Option<CustomPopup>,
    pub left_menu: LeftMenu,
    /// Let non-overlapping same-project tasks share a row.
    pub inline: bool,
    /// Enable per-project lateness projection bars.
    pub projection: bool,
    /// Extra months appended to the visible range.
    pub extend_months: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            screen_width: None,
            header_height: 60.0,
            column_width: None,
            step_hours: None,
            view_modes: ViewMode::ALL.to_vec(),
            view_mode: ViewMode::Day,
            bar_height: 24.0,
            padding: 8.0,
            edit_mode: true,
            date_format: "%Y-%m-%d".to_owned(),
            custom_popup: None,
            left_menu: LeftMenu::Auto,
            inline: false,
            projection: false,
            extend_months: 0,
        }
    }
}

impl Options {
    /// Height of one display row.
    pub fn row_height(&self) -> f32 {
        self.bar_height + self.padding
    }

    /// Actual label column width for a given project count.
    pub fn left_menu_width(&self, project_count: usize) -> f32 {
        match self.left_menu {
            LeftMenu::Auto if project_count > 1 => LEFT_MENU_WIDTH,
            LeftMenu::Auto => 0.0,
            LeftMenu::Fixed(w) => w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_left_menu_appears_with_multiple_projects() {
        let options = Options::default();
        assert_eq!(options.left_menu_width(1), 0.0);
        assert_eq!(options.left_menu_width(2), LEFT_MENU_WIDTH);
    }

    #[test]
    fn fixed_left_menu_ignores_project_count() {
        let options = Options {
            left_menu: LeftMenu::Fixed(120.0),
            ..Default::default()
        };
        assert_eq!(options.left_menu_width(1), 120.0);
    }
}
