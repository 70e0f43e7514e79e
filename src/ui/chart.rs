use std::collections::HashMap;

use chrono::NaiveDateTime;
use egui::{Align, CursorIcon, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use log::debug;

use crate::config::Options;
use crate::event::GanttEvent;
use crate::layout::{arrows, assign_rows, compute_projection, DependencyIndex};
use crate::model::{
    normalize_task, Edge, NormalizeContext, Project, ProjectInput, ScaleParams, Task, TimeScale,
    ViewMode,
};
use crate::ui::bars::{self, Bar, BarOrigin, DragKind, DragState};
use crate::ui::grid::{self, GridContext};
use crate::ui::popover;
use crate::ui::theme;

/// Clicks landing this soon after a completed drag are swallowed, so a
/// drag release is not misread as a select click.
const CLICK_COOLDOWN_SECS: f64 = 2.0;

/// The interactive Gantt chart: owns the normalized task/project graph,
/// the scale, and all per-frame interaction state.
///
/// The pipeline runs normalize → index → rows → projection on every load
/// or [`Self::refresh`], and scale → bars whenever the view mode or the
/// available width changes.
pub struct GanttChart {
    options: Options,
    view_mode: ViewMode,
    projects: Vec<Project>,
    /// Render set: normalized tasks plus any synthesized projection bars.
    tasks: Vec<Task>,
    index: DependencyIndex,
    /// Task id → its prerequisite ids, for the drag constraint.
    prereqs: HashMap<String, Vec<String>>,
    total_rows: usize,
    now: NaiveDateTime,
    scale: TimeScale,
    bars: Vec<Bar>,
    by_id: HashMap<String, usize>,
    layout_width: f32,
    layout_dirty: bool,
    selected: Option<String>,
    drag: Option<DragState>,
    cooldown_until: f64,
    /// Popover content, built once per task on first interaction.
    popover_cache: HashMap<String, String>,
    scrolled_to_start: bool,
    events: Vec<GanttEvent>,
}

impl GanttChart {
    pub fn new(input: &[ProjectInput], options: Options) -> Result<Self, chrono::ParseError> {
        let now = chrono::Local::now().naive_local();
        Self::with_now(input, options, now)
    }

    /// Injectable clock, used by the projection pass and the today marker.
    pub fn with_now(
        input: &[ProjectInput],
        options: Options,
        now: NaiveDateTime,
    ) -> Result<Self, chrono::ParseError> {
        let view_mode = options.view_mode;
        let layout_width = options.screen_width.unwrap_or(1200.0);
        let mut chart = Self {
            options,
            view_mode,
            projects: Vec::new(),
            tasks: Vec::new(),
            index: DependencyIndex::default(),
            prereqs: HashMap::new(),
            total_rows: 0,
            now,
            scale: TimeScale::compute(now, now, view_mode, ScaleParams {
                available_width: layout_width,
                column_width: None,
                step_hours: None,
                left_margin: 0.0,
                extend_months: 0,
            }),
            bars: Vec::new(),
            by_id: HashMap::new(),
            layout_width,
            layout_dirty: true,
            selected: None,
            drag: None,
            cooldown_until: 0.0,
            popover_cache: HashMap::new(),
            scrolled_to_start: false,
            events: Vec::new(),
        };
        chart.load(input)?;
        Ok(chart)
    }

    /// Re-normalize with new host data and re-run the whole pipeline.
    pub fn refresh(&mut self, input: &[ProjectInput]) -> Result<(), chrono::ParseError> {
        self.load(input)?;
        if let Some(selected) = &self.selected {
            if !self.by_id.contains_key(selected) {
                self.selected = None;
            }
        }
        Ok(())
    }

    fn load(&mut self, input: &[ProjectInput]) -> Result<(), chrono::ParseError> {
        let ctx = NormalizeContext {
            today: self.now.date(),
            date_format: &self.options.date_format,
        };
        let mut projects = Vec::with_capacity(input.len());
        let mut tasks = Vec::new();
        for raw_project in input {
            let mut project = Project::new(&raw_project.id, &raw_project.name);
            for raw_task in &raw_project.tasks {
                let task = normalize_task(raw_task, &raw_project.id, ctx)?;
                project.task_ids.push(task.id.clone());
                tasks.push(task);
            }
            projects.push(project);
        }

        let total_rows = assign_rows(&mut tasks, &mut projects, self.options.inline);
        let index = DependencyIndex::build(&tasks);
        if self.options.projection {
            let mut synthetic = Vec::new();
            for project in &mut projects {
                if let Some(bar) = compute_projection(project, &tasks, self.now) {
                    synthetic.push(bar);
                }
            }
            tasks.extend(synthetic);
        }

        self.prereqs = tasks
            .iter()
            .filter(|t| !t.dependencies.is_empty())
            .map(|t| (t.id.clone(), t.dependencies.clone()))
            .collect();
        debug!(
            "loaded {} projects, {} tasks, {} rows",
            projects.len(),
            tasks.len(),
            total_rows
        );
        self.by_id = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();
        self.projects = projects;
        self.tasks = tasks;
        self.index = index;
        self.total_rows = total_rows;
        self.popover_cache.clear();
        self.drag = None;
        self.layout_dirty = true;
        Ok(())
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode != self.view_mode {
            self.view_mode = mode;
            self.layout_dirty = true;
            self.events.push(GanttEvent::ViewChanged(mode));
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn unselect_all(&mut self) {
        self.selected = None;
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.by_id.get(id).and_then(|&i| self.tasks.get(i))
    }

    /// `None` for unknown ids and before the first layout pass.
    pub fn bar(&self, id: &str) -> Option<&Bar> {
        self.by_id.get(id).and_then(|&i| self.bars.get(i))
    }

    /// Rebuild scale and bars against the given width.
    fn relayout(&mut self, width: f32) {
        self.layout_width = width;
        let left_margin = self.options.left_menu_width(self.projects.len());
        let (min_date, max_date) = self
            .tasks
            .iter()
            .map(|t| (t.start, t.end))
            .fold(None, |acc: Option<(NaiveDateTime, NaiveDateTime)>, (s, e)| {
                Some(match acc {
                    None => (s, e),
                    Some((lo, hi)) => (lo.min(s), hi.max(e)),
                })
            })
            .unwrap_or((self.now, self.now + chrono::Duration::days(30)));

        self.scale = TimeScale::compute(min_date, max_date, self.view_mode, ScaleParams {
            available_width: (width - left_margin).max(100.0),
            column_width: self.options.column_width,
            step_hours: self.options.step_hours,
            left_margin,
            extend_months: self.options.extend_months,
        });
        self.bars = self
            .tasks
            .iter()
            .map(|t| Bar::from_task(t, &self.scale, &self.options))
            .collect();
        self.by_id = self
            .bars
            .iter()
            .enumerate()
            .map(|(i, b)| (b.task_id.clone(), i))
            .collect();
        self.layout_dirty = false;
    }

    fn progress_editable(&self, task: &Task) -> bool {
        self.options.edit_mode
            && !task.invalid
            && !task.is_group
            && !task.is_projection
            && task.progress > 0.0
            && task.progress < 100.0
    }

    fn movable(&self, task: &Task) -> bool {
        self.options.edit_mode
            && !task.invalid
            && !task.is_group
            && !task.is_projection
            && task.progress == 0.0
    }

    fn begin_drag(&mut self, idx: usize, kind: DragKind, pointer_x: f32) {
        let primary = self.bars[idx].task_id.clone();
        let mut origins = vec![(primary.clone(), BarOrigin::of(&self.bars[idx]))];
        if kind != DragKind::Progress {
            for id in self.index.cascade(&primary) {
                if let Some(&i) = self.by_id.get(&id) {
                    origins.push((id, BarOrigin::of(&self.bars[i])));
                }
            }
        }
        self.drag = Some(DragState {
            kind,
            origins,
            start_pointer_x: pointer_x,
            moved: false,
        });
    }

    fn step_drag(&mut self, pointer_x: f32) {
        let snap = self.scale.snap_unit();
        if let Some(state) = self.drag.as_mut() {
            let raw_dx = pointer_x - state.start_pointer_x;
            bars::apply_drag(&mut self.bars, &self.by_id, &self.prereqs, state, raw_dx, snap);
            if !state.moved {
                let (id, origin) = &state.origins[0];
                if let Some(&idx) = self.by_id.get(id) {
                    let bar = &self.bars[idx];
                    state.moved = (bar.x - origin.x).abs() > 0.01
                        || (bar.width - origin.width).abs() > 0.01
                        || (bar.progress_width - origin.progress_width).abs() > 0.01;
                }
            }
        }
    }

    fn finish_drag(&mut self, now_secs: f64) {
        let Some(state) = self.drag.take() else { return };
        if !state.moved {
            return;
        }
        self.cooldown_until = now_secs + CLICK_COOLDOWN_SECS;

        if state.kind == DragKind::Progress {
            let (primary, _) = &state.origins[0];
            if let Some(&idx) = self.by_id.get(primary) {
                let bar = &self.bars[idx];
                let progress = (bar.progress_width / bar.width * 100.0).round();
                self.tasks[idx].progress = progress;
                self.popover_cache.remove(primary);
                self.events.push(GanttEvent::ProgressChanged {
                    task_id: primary.clone(),
                    progress,
                });
            }
            return;
        }

        let changed: Vec<String> = bars::changed_bars(&self.bars, &self.by_id, &state)
            .into_iter()
            .map(str::to_owned)
            .collect();
        for id in changed {
            let Some(&idx) = self.by_id.get(&id) else { continue };
            let bar = &self.bars[idx];
            let start = self.scale.x_to_date(bar.x, Edge::Start);
            let end = self.scale.x_to_date(bar.x + bar.width, Edge::End);
            let task = &mut self.tasks[idx];
            task.start = start;
            task.end = end.max(start);
            // Re-derive the bar from the snapped dates.
            self.bars[idx] = Bar::from_task(&self.tasks[idx], &self.scale, &self.options);
            self.popover_cache.remove(&id);
            self.events.push(GanttEvent::DateChanged {
                task_id: id,
                start,
                end,
            });
        }
    }

    fn handle_click(&mut self, task_id: &str, now_secs: f64) {
        if now_secs < self.cooldown_until {
            return;
        }
        let was_active = self.selected.as_deref() == Some(task_id);
        if was_active {
            self.events.push(GanttEvent::Clicked {
                task_id: task_id.to_owned(),
            });
        }
        self.selected = if was_active {
            None
        } else {
            Some(task_id.to_owned())
        };
    }

    /// Draw the chart and handle all interaction for this frame; returns
    /// the notifications accumulated since the previous call.
    pub fn show(&mut self, ui: &mut Ui) -> Vec<GanttEvent> {
        let avail = ui.available_size();
        if self.layout_dirty || (self.options.screen_width.is_none() && (avail.x - self.layout_width).abs() > 1.0) {
            self.relayout(self.options.screen_width.unwrap_or(avail.x));
        }
        let now_secs = ui.input(|i| i.time);

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let content = {
                    let ctx = GridContext {
                        scale: &self.scale,
                        options: &self.options,
                        projects: &self.projects,
                        total_rows: self.total_rows,
                        now: self.now,
                    };
                    ctx.size()
                };
                let canvas = Vec2::new(content.x.max(avail.x), content.y.max(avail.y));
                let (response, painter) = ui.allocate_painter(canvas, Sense::click());
                let origin = response.rect.min;
                let mut consumed_click = false;

                {
                    let ctx = GridContext {
                        scale: &self.scale,
                        options: &self.options,
                        projects: &self.projects,
                        total_rows: self.total_rows,
                        now: self.now,
                    };
                    grid::draw_grid(&painter, origin, &ctx);
                    grid::draw_axis(&painter, origin, &ctx);
                }

                self.draw_arrows(&painter, origin);

                for idx in 0..self.bars.len() {
                    consumed_click |= self.show_bar(ui, &painter, origin, idx, now_secs);
                }

                self.show_popover(ui, response.rect);

                if response.clicked() && !consumed_click {
                    self.selected = None;
                }

                if !self.scrolled_to_start {
                    self.scrolled_to_start = true;
                    let target_date = if self.now >= self.scale.start && self.now <= self.scale.end
                    {
                        self.now
                    } else {
                        self.tasks.iter().map(|t| t.start).min().unwrap_or(self.scale.start)
                    };
                    let x = origin.x + self.scale.date_to_x(target_date);
                    ui.scroll_to_rect(
                        Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(1.0, 1.0)),
                        Some(Align::Center),
                    );
                }
            });

        std::mem::take(&mut self.events)
    }

    fn draw_arrows(&self, painter: &egui::Painter, origin: Pos2) {
        let shift = origin.to_vec2();
        for task in &self.tasks {
            let Some(&to_idx) = self.by_id.get(&task.id) else { continue };
            for dep in &task.dependencies {
                // Unresolved ids simply get no arrow.
                let Some(&from_idx) = self.by_id.get(dep) else { continue };
                let path = arrows::route(
                    self.bars[from_idx].rect().translate(shift),
                    self.bars[to_idx].rect().translate(shift),
                );
                let tip = *path.points.last().unwrap_or(&Pos2::ZERO);
                painter.add(egui::Shape::line(
                    path.points,
                    Stroke::new(1.5, theme::ARROW_COLOR),
                ));
                painter.add(egui::Shape::convex_polygon(
                    arrows::arrowhead(tip, theme::ARROW_HEAD),
                    theme::ARROW_COLOR,
                    Stroke::NONE,
                ));
            }
        }
    }

    /// Draw one bar and run its interaction state machine. Returns true
    /// when this bar consumed the frame's click.
    fn show_bar(
        &mut self,
        ui: &mut Ui,
        painter: &egui::Painter,
        origin: Pos2,
        idx: usize,
        now_secs: f64,
    ) -> bool {
        let is_selected = self.selected.as_deref() == Some(self.bars[idx].task_id.as_str());
        let rect = bars::draw_bar(painter, &self.bars[idx], &self.tasks[idx], origin, is_selected);

        let task = &self.tasks[idx];
        if task.invalid || task.is_projection {
            return false;
        }
        let movable = self.movable(task);
        let progress_editable = self.progress_editable(task);
        let task_id = task.id.clone();
        let mut consumed = false;

        let body = ui.interact(
            rect,
            ui.make_persistent_id(("gantt-bar", &task_id)),
            if movable { Sense::click_and_drag() } else { Sense::click() },
        );

        if body.clicked() {
            self.handle_click(&task_id, now_secs);
            consumed = true;
        }
        if body.hovered() {
            ui.ctx().set_cursor_icon(if movable {
                CursorIcon::Grab
            } else {
                CursorIcon::PointingHand
            });
        }

        if movable {
            let left_rect = Rect::from_min_max(
                Pos2::new(rect.left() - theme::HANDLE_WIDTH * 0.5, rect.top()),
                Pos2::new(rect.left() + theme::HANDLE_WIDTH * 0.5, rect.bottom()),
            );
            let right_rect = Rect::from_min_max(
                Pos2::new(rect.right() - theme::HANDLE_WIDTH * 0.5, rect.top()),
                Pos2::new(rect.right() + theme::HANDLE_WIDTH * 0.5, rect.bottom()),
            );
            let left = ui.interact(
                left_rect.expand(4.0),
                ui.make_persistent_id(("gantt-resize-left", &task_id)),
                Sense::drag(),
            );
            let right = ui.interact(
                right_rect.expand(4.0),
                ui.make_persistent_id(("gantt-resize-right", &task_id)),
                Sense::drag(),
            );

            for (response, kind) in [
                (&left, DragKind::ResizeLeft),
                (&right, DragKind::ResizeRight),
                (&body, DragKind::Move),
            ] {
                let pointer_x = response
                    .interact_pointer_pos()
                    .map(|p| p.x)
                    .unwrap_or(0.0);
                if response.drag_started() && self.drag.is_none() {
                    self.begin_drag(idx, kind, pointer_x);
                    self.selected = Some(task_id.clone());
                    consumed = true;
                }
                if response.dragged() && self.dragging(&task_id, kind) {
                    ui.ctx().set_cursor_icon(match kind {
                        DragKind::Move => CursorIcon::Grabbing,
                        _ => CursorIcon::ResizeHorizontal,
                    });
                    self.step_drag(pointer_x);
                }
                if response.drag_stopped() && self.dragging(&task_id, kind) {
                    self.finish_drag(now_secs);
                }
            }
            if left.hovered() || right.hovered() {
                ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
            }
        }

        if progress_editable {
            let bar = &self.bars[idx];
            let tip = Pos2::new(rect.left() + bar.progress_width, rect.bottom() + 3.0);
            let handle = ui.interact(
                Rect::from_center_size(tip, Vec2::splat(12.0)),
                ui.make_persistent_id(("gantt-progress", &task_id)),
                Sense::drag(),
            );
            let pointer_x = handle.interact_pointer_pos().map(|p| p.x).unwrap_or(0.0);
            if handle.drag_started() && self.drag.is_none() {
                self.begin_drag(idx, DragKind::Progress, pointer_x);
                consumed = true;
            }
            if handle.dragged() && self.dragging(&task_id, DragKind::Progress) {
                ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
                self.step_drag(pointer_x);
            }
            if handle.drag_stopped() && self.dragging(&task_id, DragKind::Progress) {
                self.finish_drag(now_secs);
            }
        }

        if (is_selected || body.hovered()) && (movable || progress_editable) {
            bars::draw_handles(
                painter,
                rect,
                self.bars[idx].progress_width,
                progress_editable,
            );
        }

        consumed
    }

    fn dragging(&self, task_id: &str, kind: DragKind) -> bool {
        self.drag
            .as_ref()
            .is_some_and(|d| d.kind == kind && d.origins[0].0 == task_id)
    }

    fn show_popover(&mut self, ui: &Ui, chart_rect: Rect) {
        let Some(selected) = self.selected.clone() else { return };
        let Some(&idx) = self.by_id.get(&selected) else { return };
        let text = self
            .popover_cache
            .entry(selected.clone())
            .or_insert_with(|| {
                popover::build_text(&self.tasks[idx], self.options.custom_popup.as_ref())
            })
            .clone();
        let bar_rect = self.bars[idx].rect().translate(chart_rect.min.to_vec2());
        popover::show(
            ui.ctx(),
            egui::Id::new(("gantt-popover", &selected)),
            chart_rect,
            bar_rect,
            &text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    fn sample_input() -> Vec<ProjectInput> {
        serde_json::from_str(
            r#"[{
                "id": "p1",
                "name": "Build",
                "tasks": [
                    {"id": "a", "name": "Design", "start": "2024-01-01", "end": "2024-01-05", "progress": 50},
                    {"id": "b", "name": "Implement", "start": "2024-01-06", "end": "2024-01-12", "dependencies": "a"}
                ]
            }]"#,
        )
        .unwrap()
    }

    fn chart() -> GanttChart {
        let mut options = Options::default();
        options.screen_width = Some(1000.0);
        GanttChart::with_now(&sample_input(), options, dt(2024, 1, 3)).expect("chart")
    }

    #[test]
    fn pipeline_normalizes_and_indexes() {
        let chart = chart();
        assert_eq!(chart.projects().len(), 1);
        assert!(chart.task("a").is_some());
        assert_eq!(chart.index.dependents("a"), ["b"]);
        assert_eq!(chart.total_rows, 2);
    }

    #[test]
    fn day_mode_bar_spans_its_day_columns() {
        let mut chart = chart();
        chart.relayout(1000.0);
        let scale_col = chart.scale.column_width;
        let bar = chart.bar("a").expect("bar");
        // Four day-columns for Jan 1 .. Jan 5, progress fill at 50%.
        assert!((bar.width - 4.0 * scale_col).abs() < 0.5);
        assert!((bar.progress_width - bar.width / 2.0).abs() < 0.5);
    }

    #[test]
    fn view_mode_switch_marks_layout_dirty_and_notifies() {
        let mut chart = chart();
        chart.set_view_mode(ViewMode::Week);
        assert!(chart.layout_dirty);
        assert_eq!(chart.events, vec![GanttEvent::ViewChanged(ViewMode::Week)]);
        chart.set_view_mode(ViewMode::Week);
        assert_eq!(chart.events.len(), 1);
    }

    #[test]
    fn refresh_replaces_the_task_set() {
        let mut chart = chart();
        let next: Vec<ProjectInput> = serde_json::from_str(
            r#"[{"id": "p2", "name": "Next", "tasks": [
                {"id": "z", "name": "Ship", "start": "2024-02-01", "end": "2024-02-03"}
            ]}]"#,
        )
        .unwrap();
        chart.refresh(&next).expect("refresh");
        assert!(chart.task("a").is_none());
        assert!(chart.task("z").is_some());
    }

    #[test]
    fn refresh_drops_a_stale_selection() {
        let mut chart = chart();
        chart.selected = Some("a".to_owned());
        chart.refresh(&[]).expect("refresh");
        assert!(chart.selected.is_none());
    }

    #[test]
    fn drag_stop_converts_pixels_back_to_dates() {
        let mut chart = chart();
        chart.relayout(1000.0);
        let idx = chart.by_id["b"];
        let col = chart.scale.column_width;
        chart.begin_drag(idx, DragKind::Move, 0.0);
        // Two whole columns to the right.
        chart.step_drag(2.0 * col);
        chart.finish_drag(10.0);

        let task = chart.task("b").expect("task");
        assert_eq!(task.start, dt(2024, 1, 8));
        assert_eq!(task.end.date(), NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
        assert!(matches!(
            chart.events.last(),
            Some(GanttEvent::DateChanged { task_id, .. }) if task_id == "b"
        ));
        // Completed drags arm the click cooldown.
        chart.handle_click("b", 10.5);
        assert!(chart.selected.is_none());
        chart.handle_click("b", 13.0);
        assert_eq!(chart.selected.as_deref(), Some("b"));
    }

    #[test]
    fn dependent_cannot_be_dragged_before_its_prerequisite() {
        let mut chart = chart();
        chart.relayout(1000.0);
        let idx = chart.by_id["b"];
        let before = chart.bar("b").expect("bar").x;
        let a_x = chart.bar("a").expect("bar").x;
        chart.begin_drag(idx, DragKind::Move, 0.0);
        chart.step_drag(a_x - before - 200.0);
        assert_eq!(chart.bar("b").expect("bar").x, before);
        chart.finish_drag(10.0);
        assert!(chart.events.iter().all(|e| !matches!(e, GanttEvent::DateChanged { .. })));
    }

    #[test]
    fn moving_a_prerequisite_cascades_to_dependents() {
        let mut chart = chart();
        chart.relayout(1000.0);
        let idx = chart.by_id["a"];
        let col = chart.scale.column_width;
        let b_before = chart.bar("b").expect("bar").x;
        chart.begin_drag(idx, DragKind::Move, 0.0);
        chart.step_drag(2.0 * col);
        assert!((chart.bar("b").expect("bar").x - (b_before + 2.0 * col)).abs() < 0.5);
        chart.finish_drag(10.0);
        // Both tasks report a date change.
        let changed: Vec<_> = chart
            .events
            .iter()
            .filter_map(|e| match e {
                GanttEvent::DateChanged { task_id, .. } => Some(task_id.as_str()),
                _ => None,
            })
            .collect();
        assert!(changed.contains(&"a"));
        assert!(changed.contains(&"b"));
    }

    #[test]
    fn progress_drag_reports_a_percentage() {
        let mut chart = chart();
        chart.relayout(1000.0);
        let idx = chart.by_id["a"];
        let width = chart.bars[idx].width;
        chart.begin_drag(idx, DragKind::Progress, 0.0);
        // Push the handle far past the right edge; it clamps to the bar.
        chart.step_drag(width * 3.0);
        chart.finish_drag(10.0);
        assert_eq!(chart.task("a").expect("task").progress, 100.0);
        assert!(matches!(
            chart.events.last(),
            Some(GanttEvent::ProgressChanged { progress, .. }) if *progress == 100.0
        ));
    }

    #[test]
    fn click_toggles_single_selection() {
        let mut chart = chart();
        chart.handle_click("a", 100.0);
        assert_eq!(chart.selected.as_deref(), Some("a"));
        chart.handle_click("b", 101.0);
        assert_eq!(chart.selected.as_deref(), Some("b"));
        // Clicking the active bar fires the activation event and clears.
        chart.handle_click("b", 102.0);
        assert!(chart.selected.is_none());
        assert!(chart
            .events
            .iter()
            .any(|e| matches!(e, GanttEvent::Clicked { task_id } if task_id == "b")));
    }

    #[test]
    fn projection_bar_joins_the_render_set_but_not_the_rows() {
        let input: Vec<ProjectInput> = serde_json::from_str(
            r#"[{"id": "p1", "name": "Late", "tasks": [
                {"id": "a", "name": "Work", "start": "2024-01-01", "end": "2024-01-10",
                 "progress": 50, "currentTask": true}
            ]}]"#,
        )
        .unwrap();
        let mut options = Options::default();
        options.screen_width = Some(1000.0);
        options.projection = true;
        let chart = GanttChart::with_now(&input, options, dt(2024, 1, 11)).expect("chart");
        assert_eq!(chart.tasks.len(), 2);
        assert_eq!(chart.total_rows, 1);
        let projection = chart.tasks.iter().find(|t| t.is_projection).expect("bar");
        assert_eq!(projection.duration_days(), 5);
        assert_eq!(chart.projects[0].lateness_days, 5);
    }
}
