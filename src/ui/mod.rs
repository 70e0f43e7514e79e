pub mod bars;
pub mod chart;
pub mod grid;
pub mod popover;
pub mod theme;

pub use chart::GanttChart;
