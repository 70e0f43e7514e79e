#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;

use anyhow::Context;
use chrono::Duration;

use gantt_view::model::task::{DependencyField, PersonInput};
use gantt_view::model::ProjectInput;
use gantt_view::{GanttChart, Options, TaskInput, ViewMode};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let input = match std::env::args().nth(1) {
        Some(path) => load_file(&path)?,
        None => sample_input(),
    };
    let task_count = input.iter().map(|p| p.tasks.len()).sum();

    let options = Options {
        view_modes: ViewMode::ALL.to_vec(),
        projection: true,
        ..Options::default()
    };
    let chart = GanttChart::new(&input, options).context("failed to parse task dates")?;

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt View"),
        ..Default::default()
    };
    eframe::run_native(
        "Gantt View",
        native,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, chart, task_count)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start ui: {e}"))
}

/// Load projects from a JSON file: an array of `{id, name, tasks}` records.
fn load_file(path: &str) -> anyhow::Result<Vec<ProjectInput>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid project data in {path}"))
}

fn sample_input() -> Vec<ProjectInput> {
    let day = |offset: i64| {
        (chrono::Local::now().date_naive() + Duration::days(offset))
            .format("%Y-%m-%d")
            .to_string()
    };
    let task = |id: &str, name: &str, start: i64, end: i64| TaskInput {
        id: Some(id.to_owned()),
        name: name.to_owned(),
        start: Some(day(start)),
        end: Some(day(end)),
        ..TaskInput::default()
    };

    let website = ProjectInput {
        id: "website".to_owned(),
        name: "Website".to_owned(),
        tasks: vec![
            TaskInput {
                progress: Some(100.0),
                users: vec![PersonInput { name: "Mara".to_owned() }],
                ..task("kickoff", "Kickoff", -9, -6)
            },
            TaskInput {
                progress: Some(60.0),
                dependencies: Some(DependencyField::Joined("kickoff".to_owned())),
                current: true,
                departments: vec![PersonInput { name: "Design".to_owned() }],
                ..task("design", "Design", -5, 1)
            },
            TaskInput {
                dependencies: Some(DependencyField::List(vec!["design".to_owned()])),
                ..task("build", "Implementation", 2, 9)
            },
            TaskInput {
                dependencies: Some(DependencyField::Joined("build".to_owned())),
                ..task("launch", "Launch", 10, 10)
            },
        ],
    };

    let marketing = ProjectInput {
        id: "marketing".to_owned(),
        name: "Marketing".to_owned(),
        tasks: vec![
            TaskInput {
                progress: Some(30.0),
                ..task("copy", "Copywriting", -2, 4)
            },
            TaskInput {
                dependencies: Some(DependencyField::Joined("copy, build".to_owned())),
                ..task("campaign", "Launch campaign", 10, 16)
            },
        ],
    };

    vec![website, marketing]
}
