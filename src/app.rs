use eframe::egui;
use log::info;

use gantt_view::model::ViewMode;
use gantt_view::{GanttChart, GanttEvent};

/// Demo host application: a toolbar with the view-mode switcher, the
/// chart itself, and a status bar echoing chart notifications.
pub struct GanttApp {
    chart: GanttChart,
    status_message: String,
    task_count: usize,
}

impl GanttApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, chart: GanttChart, task_count: usize) -> Self {
        Self {
            chart,
            status_message: "Ready".to_owned(),
            task_count,
        }
    }

    fn describe(&self, event: &GanttEvent) -> String {
        match event {
            GanttEvent::ViewChanged(mode) => format!("View: {}", mode.label()),
            GanttEvent::DateChanged { task_id, start, end } => format!(
                "'{}' moved to {} – {}",
                task_id,
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            GanttEvent::ProgressChanged { task_id, progress } => {
                format!("'{}' progress set to {:.0}%", task_id, progress)
            }
            GanttEvent::Clicked { task_id } => format!("'{}' activated", task_id),
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Gantt").strong());
                ui.separator();
                let modes: Vec<ViewMode> = self.chart.options().view_modes.clone();
                let active = self.chart.view_mode();
                for mode in modes {
                    if ui.selectable_label(mode == active, mode.label()).clicked() {
                        self.chart.set_view_mode(mode);
                    }
                }
            });
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(egui::Color32::from_gray(170)),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Projects: {} · Tasks: {}",
                                self.chart.projects().len(),
                                self.task_count
                            ))
                            .size(10.5)
                            .color(egui::Color32::from_gray(120)),
                        );
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                for event in self.chart.show(ui) {
                    let line = self.describe(&event);
                    info!("{line}");
                    self.status_message = line;
                }
            });
    }
}
