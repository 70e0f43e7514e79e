use std::collections::HashMap;

use egui::{Color32, Pos2, Rect, Rounding, Stroke, Vec2};

use crate::config::Options;
use crate::model::{Task, TimeScale};
use crate::ui::theme;

/// Bars never collapse below this width, whatever the drag does.
const MIN_BAR_WIDTH: f32 = 2.0;

/// The rendered projection of a task: pure pixel geometry, rebuilt on
/// every relayout and mutated in place while a drag is in flight.
#[derive(Debug, Clone)]
pub struct Bar {
    pub task_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub progress_width: f32,
    pub row: usize,
}

impl Bar {
    pub fn from_task(task: &Task, scale: &TimeScale, options: &Options) -> Self {
        let x = scale.date_to_x(task.start);
        let width = (scale.date_to_x(task.end) - x).max(MIN_BAR_WIDTH);
        let y = options.header_height
            + task.row as f32 * options.row_height()
            + options.padding / 2.0;
        let progress_width = if task.invalid {
            0.0
        } else {
            width * (task.progress / 100.0).clamp(0.0, 1.0)
        };
        Self {
            task_id: task.id.clone(),
            x,
            y,
            width,
            height: options.bar_height,
            progress_width,
            row: task.row,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    pub fn progress_rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.x, self.y),
            Vec2::new(self.progress_width, self.height),
        )
    }
}

/// Which gesture is in flight on the primary bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeLeft,
    ResizeRight,
    Progress,
}

/// Geometry captured when a drag starts, one per affected bar.
#[derive(Debug, Clone, Copy)]
pub struct BarOrigin {
    pub x: f32,
    pub width: f32,
    pub progress_width: f32,
}

impl BarOrigin {
    pub fn of(bar: &Bar) -> Self {
        Self {
            x: bar.x,
            width: bar.width,
            progress_width: bar.progress_width,
        }
    }
}

/// One in-flight drag gesture: the grabbed bar plus every bar reached by
/// the dependency cascade, each with its captured origin geometry.
#[derive(Debug, Clone)]
pub struct DragState {
    pub kind: DragKind,
    /// Origins in cascade order, the grabbed bar first.
    pub origins: Vec<(String, BarOrigin)>,
    pub start_pointer_x: f32,
    /// Set once any geometry actually changed; drives the stop handling
    /// and the post-drag click cooldown.
    pub moved: bool,
}

/// Round a raw pointer delta to the scale's snapping unit.
pub fn snap_delta(raw_dx: f32, unit: f32) -> f32 {
    if unit <= 0.0 {
        return raw_dx;
    }
    (raw_dx / unit).round() * unit
}

/// Apply one drag step to every affected bar.
///
/// The grabbed bar gets the gesture's own kind; cascaded dependents are
/// always whole-bar moves of the same raw delta. A move or left-resize
/// whose candidate left edge would pass a prerequisite bar's current left
/// edge is rejected for this step, leaving that bar's geometry untouched.
pub fn apply_drag(
    bars: &mut [Bar],
    by_id: &HashMap<String, usize>,
    prereqs: &HashMap<String, Vec<String>>,
    state: &DragState,
    raw_dx: f32,
    snap_unit: f32,
) {
    let dx = snap_delta(raw_dx, snap_unit);
    for (i, (id, origin)) in state.origins.iter().enumerate() {
        let Some(&idx) = by_id.get(id) else { continue };
        let kind = if i == 0 { state.kind } else { DragKind::Move };

        let min_x = prereqs
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|p| by_id.get(p))
            .map(|&j| bars[j].x)
            .fold(f32::MIN, f32::max);

        let bar = &mut bars[idx];
        match kind {
            DragKind::Move => {
                let nx = origin.x + dx;
                if nx >= min_x {
                    bar.x = nx;
                }
            }
            DragKind::ResizeLeft => {
                let nx = origin.x + dx;
                let nw = origin.width - dx;
                if nw >= MIN_BAR_WIDTH && nx >= min_x {
                    bar.x = nx;
                    bar.width = nw;
                }
            }
            DragKind::ResizeRight => {
                let nw = origin.width + dx;
                if nw >= MIN_BAR_WIDTH {
                    bar.width = nw;
                }
            }
            DragKind::Progress => {
                bar.progress_width = (origin.progress_width + raw_dx).clamp(0.0, bar.width);
            }
        }
        if kind != DragKind::Progress {
            // Progress keeps its fraction of the bar through moves/resizes.
            let fraction = if origin.width > 0.0 {
                origin.progress_width / origin.width
            } else {
                0.0
            };
            bar.progress_width = bar.width * fraction;
        }
    }
}

/// Ids of the bars whose geometry differs from their drag origin.
pub fn changed_bars<'a>(
    bars: &[Bar],
    by_id: &HashMap<String, usize>,
    state: &'a DragState,
) -> Vec<&'a str> {
    state
        .origins
        .iter()
        .filter(|(id, origin)| {
            by_id.get(id).is_some_and(|&idx| {
                let bar = &bars[idx];
                (bar.x - origin.x).abs() > 0.01 || (bar.width - origin.width).abs() > 0.01
            })
        })
        .map(|(id, _)| id.as_str())
        .collect()
}

// ── Painting ─────────────────────────────────────────────────────────────────

fn class_color(class: &str) -> Color32 {
    // Stable mapping from the style tag to the task palette.
    let hash = class.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    const PALETTE: &[Color32] = &[
        Color32::from_rgb(66, 133, 244),
        Color32::from_rgb(52, 168, 83),
        Color32::from_rgb(171, 71, 188),
        Color32::from_rgb(251, 140, 0),
        Color32::from_rgb(0, 172, 193),
        Color32::from_rgb(220, 20, 60),
    ];
    PALETTE[hash % PALETTE.len()]
}

pub fn bar_fill(task: &Task) -> Color32 {
    if task.is_projection {
        theme::BAR_PROJECTION
    } else if task.invalid {
        theme::BAR_INVALID
    } else if task.is_group {
        theme::BAR_GROUP_FILL
    } else if let Some(class) = &task.custom_class {
        class_color(class)
    } else {
        theme::BAR_FILL
    }
}

fn dashed_rect(painter: &egui::Painter, rect: Rect, stroke: Stroke) {
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    for pair in corners.windows(2) {
        painter.add(egui::Shape::dashed_line(pair, stroke, 4.0, 3.0));
    }
}

/// Draw one bar, returning its rect for hit testing.
pub fn draw_bar(
    painter: &egui::Painter,
    bar: &Bar,
    task: &Task,
    origin: Pos2,
    is_selected: bool,
) -> Rect {
    let rect = bar.rect().translate(origin.to_vec2());
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    if task.invalid {
        // Non-interactive dashed placeholder, no progress fill.
        painter.rect_filled(rect, rounding, theme::BAR_INVALID.gamma_multiply(0.35));
        dashed_rect(painter, rect, Stroke::new(1.0, theme::BAR_INVALID));
    } else {
        painter.rect_filled(rect, rounding, bar_fill(task));
        if bar.progress_width > 0.0 && !task.is_group && !task.is_projection {
            let progress = bar.progress_rect().translate(origin.to_vec2());
            painter.rect_filled(progress, rounding, theme::PROGRESS_FILL);
            if bar.progress_width < bar.width - 1.0 {
                let tick_x = rect.left() + bar.progress_width;
                painter.line_segment(
                    [
                        Pos2::new(tick_x, rect.top() + 2.0),
                        Pos2::new(tick_x, rect.bottom() - 2.0),
                    ],
                    Stroke::new(1.0, Color32::from_white_alpha(60)),
                );
            }
        }
    }

    if is_selected {
        painter.rect_stroke(
            rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Label inside the bar, flipped outside when the bar is too narrow.
    let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
    let text_y = rect.center().y - galley.size().y / 2.0;
    if galley.size().x + 10.0 <= rect.width() {
        let clipped = painter.with_clip_rect(rect);
        clipped.galley(
            Pos2::new(rect.center().x - galley.size().x / 2.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    } else {
        let external = painter.layout_no_wrap(
            task.name.clone(),
            theme::font_bar(),
            theme::TEXT_SECONDARY,
        );
        painter.galley(
            Pos2::new(rect.right() + 6.0, text_y),
            external,
            Color32::TRANSPARENT,
        );
    }

    rect
}

/// Rounded pill handles on the bar edges plus the progress handle.
pub fn draw_handles(painter: &egui::Painter, rect: Rect, progress_width: f32, progress_editable: bool) {
    let handle_h = rect.height() * 0.55;
    let handle_y = rect.center().y - handle_h / 2.0;
    let left = Rect::from_min_size(Pos2::new(rect.left() - 1.5, handle_y), Vec2::new(4.0, handle_h));
    let right = Rect::from_min_size(Pos2::new(rect.right() - 2.5, handle_y), Vec2::new(4.0, handle_h));
    painter.rect_filled(left, Rounding::same(2.0), theme::HANDLE_COLOR);
    painter.rect_filled(right, Rounding::same(2.0), theme::HANDLE_COLOR);

    if progress_editable {
        let tip = Pos2::new(rect.left() + progress_width, rect.bottom());
        painter.add(egui::Shape::convex_polygon(
            vec![
                Pos2::new(tip.x - 4.0, tip.y + 6.0),
                Pos2::new(tip.x + 4.0, tip.y + 6.0),
                Pos2::new(tip.x, tip.y),
            ],
            theme::HANDLE_COLOR,
            Stroke::NONE,
        ));
    }
}
