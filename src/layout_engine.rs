pub mod grid;
pub mod placement;

pub use grid::{GridPlan, GridRequest, GridShape, LayoutError, plan_grid};
pub use placement::{PlacementReport, apply_plan};
