//! Shared grids for integration tests.

#![allow(dead_code)]

use grid_planner::constants::NEIGHBORS_4;
use grid_planner::{Grid, Position, RoutingProblem};

/// 9x9 road grid with vertical obstacle walls; row 0 is open.
pub fn road_grid() -> Grid {
    Grid::from_occupancy(&[
        [0u8, 0, 0, 0, 0, 0, 0, 0, 0],
        [0, 1, 0, 1, 0, 1, 1, 1, 0],
        [0, 1, 0, 0, 0, 0, 0, 1, 0],
        [0, 1, 0, 1, 1, 1, 0, 1, 0],
        [0, 1, 0, 1, 0, 1, 0, 0, 0],
        [0, 1, 0, 1, 0, 1, 1, 1, 0],
        [0, 1, 0, 0, 0, 0, 0, 1, 0],
        [0, 1, 0, 1, 1, 1, 0, 1, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 0],
    ])
    .unwrap()
}

pub fn road_problem(start: (u16, u16), destination: (u16, u16)) -> RoutingProblem {
    RoutingProblem::new(road_grid(), start.into(), destination.into(), &NEIGHBORS_4).unwrap()
}

/// Six rooms along two rows, coverable by three range-1 routers.
pub fn room_rows() -> Grid {
    Grid::from_symbols(&["R.R.R", ".....", "R.R.R"]).unwrap()
}

/// A room at (0, 0) shut in by walls: every open cell is either off-axis
/// or has a wall on the connecting line.
pub fn sealed_room() -> Grid {
    Grid::from_symbols(&["RW..", "WW..", "...."]).unwrap()
}

pub fn p(row: u16, col: u16) -> Position {
    Position::new(row, col)
}
