//! Line-of-sight between two cells.
//!
//! Only three lines exist: same row, same column and exact diagonals
//! (`|d_row| == |d_col|`). Cells at any other relative offset are never
//! visible from each other; there is no ray casting for arbitrary slopes,
//! and coverage results depend on that.

use crate::grid::*;
use crate::location::*;

/// True if an unobstructed row, column or diagonal line joins `a` and `b`.
/// Symmetric in its arguments. The endpoints themselves are not checked.
pub fn visible(grid: &Grid, a: Position, b: Position) -> bool {
    let (d_row, d_col) = a.delta_to(b);

    if d_row == 0 {
        let (lo, hi) = ordered(a.col(), b.col());
        return ((lo + 1)..hi).all(|col| !grid.is_blocked(Position::new(a.row(), col)));
    }

    if d_col == 0 {
        let (lo, hi) = ordered(a.row(), b.row());
        return ((lo + 1)..hi).all(|row| !grid.is_blocked(Position::new(row, a.col())));
    }

    if d_row.abs() == d_col.abs() {
        let step_row = d_row.signum();
        let step_col = d_col.signum();
        return (1..d_row.abs())
            .filter_map(|i| a.offset(step_row * i, step_col * i))
            .all(|cell| !grid.is_blocked(cell));
    }

    false
}

/// Negation of [`visible`].
pub fn wall_between(grid: &Grid, a: Position, b: Position) -> bool {
    !visible(grid, a, b)
}

fn ordered(a: u16, b: u16) -> (u16, u16) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::from_symbols(rows).unwrap()
    }

    #[test]
    fn row_visibility_checks_cells_strictly_between() {
        let g = grid(&["R.W.R"]);
        assert!(visible(&g, Position::new(0, 0), Position::new(0, 1)));
        assert!(!visible(&g, Position::new(0, 0), Position::new(0, 4)));
        assert!(!visible(&g, Position::new(0, 4), Position::new(0, 0)));
        // A wall endpoint does not block itself.
        assert!(visible(&g, Position::new(0, 1), Position::new(0, 2)));
    }

    #[test]
    fn column_visibility() {
        let g = grid(&["R", ".", "W", "R"]);
        assert!(visible(&g, Position::new(0, 0), Position::new(1, 0)));
        assert!(!visible(&g, Position::new(0, 0), Position::new(3, 0)));
    }

    #[test]
    fn diagonal_visibility_in_all_directions() {
        let g = grid(&["R...", ".W..", "....", "...R"]);
        assert!(!visible(&g, Position::new(0, 0), Position::new(3, 3)));
        assert!(!visible(&g, Position::new(3, 3), Position::new(0, 0)));
        assert!(visible(&g, Position::new(3, 0), Position::new(0, 3)));
        assert!(visible(&g, Position::new(0, 3), Position::new(3, 0)));
    }

    #[test]
    fn off_axis_cells_are_never_visible() {
        let g = grid(&["....", "....", "...."]);
        assert!(!visible(&g, Position::new(0, 0), Position::new(1, 2)));
        assert!(!visible(&g, Position::new(2, 3), Position::new(0, 2)));
        assert!(wall_between(&g, Position::new(0, 0), Position::new(1, 2)));
    }

    #[test]
    fn visibility_is_symmetric() {
        let g = grid(&["R.W.R", ".W.R.", "..R..", "W...W", "R.R.R"]);
        let cells: Vec<Position> = g.positions().collect();
        for &a in &cells {
            for &b in &cells {
                assert_eq!(visible(&g, a, b), visible(&g, b, a), "{:?} {:?}", a, b);
            }
        }
    }

    #[test]
    fn a_cell_sees_itself() {
        let g = grid(&["W"]);
        assert!(visible(&g, Position::new(0, 0), Position::new(0, 0)));
    }
}
