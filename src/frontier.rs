//! Candidate generation: legal next moves and legal next placements.
//!
//! No ranking happens here. The placement problem ranks and caps the
//! candidates itself before they reach the search frontier.

use crate::grid::*;
use crate::location::*;

/// Positions reachable from `pos` with one action, in action order.
/// Only in-bounds, traversable cells are returned.
pub fn routing_successors(grid: &Grid, pos: Position, actions: &[(i32, i32)]) -> Vec<Position> {
    actions
        .iter()
        .filter_map(|&(d_row, d_col)| pos.offset(d_row, d_col))
        .filter(|&next| grid.is_traversable(next))
        .collect()
}

/// Every open cell not already holding a facility, in row-major order.
pub fn placement_candidates(grid: &Grid, placed: &[Position]) -> Vec<Position> {
    grid.open_cells()
        .filter(|cell| !placed.contains(cell))
        .collect()
}
