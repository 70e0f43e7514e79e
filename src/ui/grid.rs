use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use egui::{Align2, Pos2, Rect, Stroke, Vec2};

use crate::config::Options;
use crate::model::{Project, TimeScale, ViewMode};
use crate::ui::theme;

/// Everything the grid and axis renderers need, all derived upstream.
pub struct GridContext<'a> {
    pub scale: &'a TimeScale,
    pub options: &'a Options,
    pub projects: &'a [Project],
    pub total_rows: usize,
    pub now: NaiveDateTime,
}

impl GridContext<'_> {
    pub fn left_menu_width(&self) -> f32 {
        self.scale.left_margin
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.left_menu_width() + self.scale.grid_width(),
            self.options.header_height
                + self.total_rows.max(1) as f32 * self.options.row_height()
                + self.options.padding,
        )
    }
}

/// Background, row stripes, project separators and label column, vertical
/// ticks, weekend shading, and the today indicator.
pub fn draw_grid(painter: &egui::Painter, origin: Pos2, ctx: &GridContext<'_>) {
    let size = ctx.size();
    let header = ctx.options.header_height;
    let row_height = ctx.options.row_height();
    let grid_left = origin.x + ctx.left_menu_width();
    let grid_right = origin.x + size.x;
    let body_top = origin.y + header;

    painter.rect_filled(Rect::from_min_size(origin, size), 0.0, theme::BG_DARK);

    // Zebra stripes and row separators.
    for row in 0..ctx.total_rows {
        let y = body_top + row as f32 * row_height;
        if row % 2 == 0 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(size.x, row_height)),
                0.0,
                theme::BG_PANEL,
            );
        }
        painter.line_segment(
            [
                Pos2::new(origin.x, y + row_height),
                Pos2::new(grid_right, y + row_height),
            ],
            Stroke::new(0.5, theme::BORDER_SUBTLE),
        );
    }

    // Weekend shading and today column, Day mode only.
    if ctx.scale.mode == ViewMode::Day {
        let today_x = origin.x + ctx.scale.date_to_x(ctx.now.date().and_time(NaiveTime::MIN));
        for (i, tick) in ctx.scale.ticks.iter().enumerate() {
            let x = origin.x + ctx.scale.column_x(i);
            let weekday = tick.weekday();
            if weekday == Weekday::Sat || weekday == Weekday::Sun {
                painter.rect_filled(
                    Rect::from_min_size(
                        Pos2::new(x, body_top),
                        Vec2::new(ctx.scale.column_width, size.y - header),
                    ),
                    0.0,
                    theme::BG_WEEKEND,
                );
            }
        }
        if today_x >= grid_left && today_x + ctx.scale.column_width <= grid_right {
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(today_x, body_top),
                    Vec2::new(ctx.scale.column_width, size.y - header),
                ),
                0.0,
                theme::TODAY_COLUMN,
            );
        }
    }

    // Vertical ticks, thickened on coarse-boundary columns.
    for (i, tick) in ctx.scale.ticks.iter().enumerate() {
        let x = origin.x + ctx.scale.column_x(i);
        let thick = match ctx.scale.mode {
            ViewMode::Day => tick.weekday() == Weekday::Mon,
            ViewMode::Week => tick.day() <= 7,
            ViewMode::Month => tick.month() == 1,
            _ => false,
        };
        let stroke = if thick {
            Stroke::new(1.5, theme::GRID_LINE_THICK)
        } else {
            Stroke::new(0.5, theme::GRID_LINE)
        };
        painter.line_segment(
            [Pos2::new(x, body_top), Pos2::new(x, origin.y + size.y)],
            stroke,
        );
    }

    // Full-height today line outside Day mode.
    if ctx.scale.mode != ViewMode::Day {
        let x = origin.x + ctx.scale.date_to_x(ctx.now);
        if x >= grid_left && x <= grid_right {
            painter.line_segment(
                [Pos2::new(x, body_top), Pos2::new(x, origin.y + size.y)],
                Stroke::new(1.5, theme::TODAY_LINE),
            );
        }
    }

    // Project separators and the label column.
    let menu = ctx.left_menu_width();
    if menu > 0.0 {
        painter.rect_filled(
            Rect::from_min_size(
                Pos2::new(origin.x, body_top),
                Vec2::new(menu, size.y - header),
            ),
            0.0,
            theme::BG_LEFT_MENU,
        );
    }
    for project in ctx.projects {
        let top = body_top + project.first_row as f32 * row_height;
        let bottom = body_top + (project.last_row + 1) as f32 * row_height;
        painter.line_segment(
            [Pos2::new(origin.x, bottom), Pos2::new(grid_right, bottom)],
            Stroke::new(1.5, theme::BORDER_PROJECT),
        );
        if menu > 0.0 {
            painter.text(
                Pos2::new(origin.x + 10.0, (top + bottom) / 2.0),
                Align2::LEFT_CENTER,
                &project.name,
                theme::font_header(),
                theme::TEXT_PRIMARY,
            );
            if project.lateness_days > 0 {
                painter.text(
                    Pos2::new(origin.x + menu - 10.0, (top + bottom) / 2.0),
                    Align2::RIGHT_CENTER,
                    format!("+{}d", project.lateness_days),
                    theme::font_small(),
                    theme::BAR_PROJECTION,
                );
            }
        }
    }
}

fn lower_label(tick: NaiveDateTime, mode: ViewMode) -> String {
    match mode {
        ViewMode::QuarterDay | ViewMode::HalfDay => tick.format("%H").to_string(),
        ViewMode::Day => tick.format("%d").to_string(),
        ViewMode::Week => tick.format("%a %d").to_string(),
        ViewMode::Month => tick.format("%b").to_string(),
    }
}

fn upper_label(tick: NaiveDateTime, mode: ViewMode) -> String {
    match mode {
        ViewMode::QuarterDay | ViewMode::HalfDay => tick.format("%d %b").to_string(),
        ViewMode::Day | ViewMode::Week => tick.format("%b %Y").to_string(),
        ViewMode::Month => tick.format("%Y").to_string(),
    }
}

/// Header band with two label tiers per tick: the mode's fine granularity
/// below, the next coarser unit above, drawn only when it changes.
pub fn draw_axis(painter: &egui::Painter, origin: Pos2, ctx: &GridContext<'_>) {
    let size = ctx.size();
    let header = ctx.options.header_height;
    let grid_right = origin.x + size.x;

    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(size.x, header)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + header),
            Pos2::new(grid_right, origin.y + header),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    let lower_y = origin.y + header - 14.0;
    let upper_y = origin.y + header - 34.0;
    // Narrow Day columns only keep the Monday labels readable.
    let sparse_days = ctx.scale.mode == ViewMode::Day && ctx.scale.column_width < 25.0;

    let mut previous_upper: Option<String> = None;
    for (i, tick) in ctx.scale.ticks.iter().enumerate() {
        let x = origin.x + ctx.scale.column_x(i);

        let show_lower = !sparse_days || tick.weekday() == Weekday::Mon;
        if show_lower {
            painter.text(
                Pos2::new(x + 3.0, lower_y),
                Align2::LEFT_CENTER,
                lower_label(*tick, ctx.scale.mode),
                theme::font_sub(),
                theme::TEXT_SECONDARY,
            );
        }

        let upper = upper_label(*tick, ctx.scale.mode);
        if previous_upper.as_deref() != Some(upper.as_str()) {
            let galley =
                painter.layout_no_wrap(upper.clone(), theme::font_header(), theme::TEXT_PRIMARY);
            // An upper label running past the grid edge is re-centered in
            // the space remaining to its right.
            let label_x = if x + 3.0 + galley.size().x > grid_right {
                (x + (grid_right - x - galley.size().x) / 2.0).max(x)
            } else {
                x + 3.0
            };
            painter.galley(
                Pos2::new(label_x, upper_y - galley.size().y / 2.0),
                galley,
                theme::TEXT_PRIMARY,
            );
        }
        previous_upper = Some(upper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn lower_labels_follow_the_mode() {
        let tick = dt(2024, 3, 4); // a Monday
        assert_eq!(lower_label(tick, ViewMode::Day), "04");
        assert_eq!(lower_label(tick, ViewMode::Week), "Mon 04");
        assert_eq!(lower_label(tick, ViewMode::Month), "Mar");
        assert_eq!(
            lower_label(tick + chrono::Duration::hours(6), ViewMode::QuarterDay),
            "06"
        );
    }

    #[test]
    fn upper_labels_show_the_coarser_unit() {
        let tick = dt(2024, 3, 4);
        assert_eq!(upper_label(tick, ViewMode::Day), "Mar 2024");
        assert_eq!(upper_label(tick, ViewMode::Month), "2024");
        assert_eq!(upper_label(tick, ViewMode::HalfDay), "04 Mar");
    }
}
