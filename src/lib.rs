//! State-space search over 2-D grids.
//!
//! One search skeleton (`search`) serves two problems: routing an agent
//! through an obstacle grid (`routing`) and placing coverage-providing
//! facilities so every target cell is covered with line of sight
//! (`placement`). Data flows grid -> visibility -> coverage -> frontier ->
//! search, with heuristics supplied at call time.

pub mod config;
pub mod constants;
pub mod coverage;
pub mod elevator;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod heuristic;
pub mod location;
pub mod placement;
pub mod planner;
pub mod routing;
pub mod search;
pub mod visibility;

pub use error::{PlannerError, Result};
pub use grid::{CellKind, Grid};
pub use location::Position;
pub use planner::PlacementPlanner;
pub use routing::RoutingProblem;
pub use search::{Solution, Strategy};
