use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

/// Raw task record as supplied by the host, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub dependencies: Option<DependencyField>,
    #[serde(default)]
    pub custom_class: Option<String>,
    #[serde(default, rename = "isGroup")]
    pub is_group: bool,
    #[serde(default, rename = "currentTask")]
    pub current: bool,
    #[serde(default)]
    pub dates: Vec<DateRangeInput>,
    #[serde(default)]
    pub users: Vec<PersonInput>,
    #[serde(default)]
    pub departments: Vec<PersonInput>,
}

/// The dependency field accepts either a comma-separated string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DependencyField {
    List(Vec<String>),
    Joined(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeInput {
    pub start: String,
    pub end: String,
    #[serde(rename = "type")]
    pub kind: RangeKindInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RangeKindInput {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonInput {
    pub name: String,
}

/// A labeled sub-range shown in the task's detail popover.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRange {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A single normalized task on the timeline.
///
/// Invariant: `end >= start`.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Id of the owning project.
    pub project: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Completion percentage, 0–100.
    pub progress: f32,
    /// Ids of the tasks this one depends on (deduplicated, input order).
    pub dependencies: Vec<String>,
    /// Display row assigned by the row packer.
    pub row: usize,
    /// Set when one or both dates were missing from the input.
    pub invalid: bool,
    pub is_group: bool,
    /// Synthetic slippage bar, never interactive.
    pub is_projection: bool,
    /// Marks the task used for the project's lateness projection.
    pub current: bool,
    pub custom_class: Option<String>,
    pub date_ranges: Vec<LabeledRange>,
    pub users: Vec<String>,
    pub departments: Vec<String>,
}

impl Task {
    /// Whole-day duration as shown in the popover.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Context shared by every task normalization in one refresh pass.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub today: NaiveDate,
    pub date_format: &'a str,
}

/// Parse a date string with the configured format, falling back to a
/// datetime reading and a few common formats.
pub fn parse_date(s: &str, format: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let s = s.trim();
    let first = match NaiveDate::parse_from_str(s, format) {
        Ok(d) => return Ok(d.and_time(NaiveTime::MIN)),
        Err(e) => e,
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.and_time(NaiveTime::MIN));
        }
    }
    Err(first)
}

/// Split and deduplicate the dependency field, trimming entries and
/// dropping empties.
fn parse_dependencies(field: Option<&DependencyField>) -> Vec<String> {
    let raw: Vec<String> = match field {
        None => return Vec::new(),
        Some(DependencyField::List(items)) => items.clone(),
        Some(DependencyField::Joined(s)) => s.split(',').map(str::to_owned).collect(),
    };
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for dep in raw {
        let dep = dep.trim();
        if !dep.is_empty() && !out.iter().any(|d| d == dep) {
            out.push(dep.to_owned());
        }
    }
    out
}

fn generated_id(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("{}-{}", slug.trim_matches('-'), Uuid::new_v4().simple())
}

/// Normalize one raw task record.
///
/// Missing-date policy: no dates at all defaults to a two-day window from
/// today; a lone end date backfills start two days earlier; a lone start
/// date extends two days forward. Any backfill flags the task invalid.
pub fn normalize_task(
    input: &TaskInput,
    project: &str,
    ctx: NormalizeContext<'_>,
) -> Result<Task, chrono::ParseError> {
    let start = match &input.start {
        Some(s) => Some(parse_date(s, ctx.date_format)?),
        None => None,
    };
    let end = match &input.end {
        Some(s) => Some(parse_date(s, ctx.date_format)?),
        None => None,
    };

    let two_days = chrono::Duration::days(2);
    let (start, end, invalid) = match (start, end) {
        (Some(s), Some(e)) => (s, e, false),
        (Some(s), None) => (s, s + two_days, true),
        (None, Some(e)) => (e - two_days, e, true),
        (None, None) => {
            let today = ctx.today.and_time(NaiveTime::MIN);
            (today, today + two_days, true)
        }
    };
    // Repair inverted input so the end >= start invariant holds.
    let end = end.max(start);

    let mut date_ranges = Vec::with_capacity(input.dates.len());
    for range in &input.dates {
        date_ranges.push(LabeledRange {
            label: range.kind.name.clone(),
            start: parse_date(&range.start, ctx.date_format)?,
            end: parse_date(&range.end, ctx.date_format)?,
        });
    }

    Ok(Task {
        id: input
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| generated_id(&input.name)),
        name: input.name.clone(),
        project: project.to_owned(),
        start,
        end,
        progress: input.progress.unwrap_or(0.0).clamp(0.0, 100.0),
        dependencies: parse_dependencies(input.dependencies.as_ref()),
        row: 0,
        invalid,
        is_group: input.is_group,
        is_projection: false,
        current: input.current,
        custom_class: input.custom_class.clone(),
        date_ranges,
        users: input.users.iter().map(|p| p.name.clone()).collect(),
        departments: input.departments.iter().map(|p| p.name.clone()).collect(),
    })
}
