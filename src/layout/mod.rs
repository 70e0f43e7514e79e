pub mod arrows;
pub mod deps;
pub mod projection;
pub mod rows;

pub use arrows::{route, ArrowPath, ArrowTopology};
pub use deps::DependencyIndex;
pub use projection::compute_projection;
pub use rows::assign_rows;
