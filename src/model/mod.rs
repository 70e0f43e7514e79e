pub mod project;
pub mod task;
pub mod timeline;

pub use project::{Project, ProjectInput};
pub use task::{normalize_task, NormalizeContext, Task, TaskInput};
pub use timeline::{Edge, ScaleParams, TimeScale, ViewMode};
