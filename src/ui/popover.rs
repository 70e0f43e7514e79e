use egui::{Pos2, Rect, Vec2};

use crate::config::CustomPopup;
use crate::model::Task;
use crate::ui::theme;

const GAP: f32 = 8.0;

/// Assemble the popover text for a task: the host's custom content when
/// configured, otherwise name, whole-day duration, nonzero progress,
/// labeled date ranges, and linked people.
pub fn build_text(task: &Task, custom: Option<&CustomPopup>) -> String {
    match custom {
        Some(CustomPopup::Static(s)) => s.clone(),
        Some(CustomPopup::PerTask(f)) => f(task),
        None => {
            let mut lines = vec![task.name.clone()];
            let days = task.duration_days();
            lines.push(if days == 1 {
                "1 day".to_owned()
            } else {
                format!("{days} days")
            });
            if task.progress > 0.0 {
                lines.push(format!("{:.0}% done", task.progress));
            }
            for range in &task.date_ranges {
                lines.push(format!(
                    "{}: {} – {}",
                    range.label,
                    range.start.format("%Y-%m-%d"),
                    range.end.format("%Y-%m-%d"),
                ));
            }
            for user in &task.users {
                lines.push(format!("👤 {user}"));
            }
            for department in &task.departments {
                lines.push(format!("🏢 {department}"));
            }
            lines.join("\n")
        }
    }
}

/// Anchor next to the bar's right edge, flipping left and/or up whenever
/// the popover would overflow the chart's bounding box.
pub fn anchor_pos(chart: Rect, bar: Rect, size: Vec2) -> Pos2 {
    let mut x = bar.right() + GAP;
    if x + size.x > chart.right() {
        x = bar.left() - size.x - GAP;
    }
    let mut y = bar.top();
    if y + size.y > chart.bottom() {
        y = bar.bottom() - size.y;
    }
    Pos2::new(x.max(chart.left()), y.max(chart.top()))
}

/// Estimated popover extent, used for the flip decision before egui has
/// laid the area out.
pub fn estimate_size(text: &str) -> Vec2 {
    let lines = text.lines().count().max(1) as f32;
    Vec2::new(theme::POPOVER_WIDTH, lines * 16.0 + 16.0)
}

pub fn show(ctx: &egui::Context, id: egui::Id, chart: Rect, bar: Rect, text: &str) {
    let pos = anchor_pos(chart, bar, estimate_size(text));
    egui::Area::new(id)
        .order(egui::Order::Foreground)
        .fixed_pos(pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(theme::POPOVER_BG)
                .show(ui, |ui| {
                    ui.set_max_width(theme::POPOVER_WIDTH);
                    let mut lines = text.lines();
                    if let Some(title) = lines.next() {
                        ui.label(
                            egui::RichText::new(title)
                                .font(theme::font_header())
                                .color(theme::TEXT_PRIMARY)
                                .strong(),
                        );
                    }
                    for line in lines {
                        ui.label(
                            egui::RichText::new(line)
                                .font(theme::font_sub())
                                .color(theme::TEXT_SECONDARY),
                        );
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{normalize_task, NormalizeContext, TaskInput};
    use std::sync::Arc;

    fn task() -> Task {
        let input: TaskInput = serde_json::from_str(
            r#"{
                "id": "t1",
                "name": "Design",
                "start": "2024-01-01",
                "end": "2024-01-05",
                "progress": 40,
                "dates": [{"start": "2024-01-02", "end": "2024-01-03", "type": {"name": "Review"}}],
                "users": [{"name": "Ada"}]
            }"#,
        )
        .unwrap();
        let ctx = NormalizeContext {
            today: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            date_format: "%Y-%m-%d",
        };
        normalize_task(&input, "p", ctx).unwrap()
    }

    #[test]
    fn assembled_text_lists_the_task_details() {
        let text = build_text(&task(), None);
        assert!(text.starts_with("Design\n"));
        assert!(text.contains("5 days"));
        assert!(text.contains("40% done"));
        assert!(text.contains("Review: 2024-01-02 – 2024-01-03"));
        assert!(text.contains("Ada"));
    }

    #[test]
    fn zero_progress_is_omitted() {
        let mut t = task();
        t.progress = 0.0;
        assert!(!build_text(&t, None).contains("done"));
    }

    #[test]
    fn custom_formatter_wins() {
        let custom = CustomPopup::PerTask(Arc::new(|t: &Task| format!("<{}>", t.id)));
        assert_eq!(build_text(&task(), Some(&custom)), "<t1>");
    }

    #[test]
    fn popover_flips_at_the_chart_edges() {
        let chart = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
        let size = Vec2::new(240.0, 100.0);

        let roomy = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(60.0, 24.0));
        let pos = anchor_pos(chart, roomy, size);
        assert_eq!(pos, Pos2::new(168.0, 100.0));

        let right_edge = Rect::from_min_size(Pos2::new(700.0, 100.0), Vec2::new(60.0, 24.0));
        let pos = anchor_pos(chart, right_edge, size);
        assert!(pos.x + size.x <= right_edge.left());

        let bottom_edge = Rect::from_min_size(Pos2::new(100.0, 560.0), Vec2::new(60.0, 24.0));
        let pos = anchor_pos(chart, bottom_edge, size);
        assert!(pos.y + size.y <= bottom_edge.bottom());
    }
}
