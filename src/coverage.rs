//! Coverage evaluation: which target cells a facility reaches.
//!
//! A facility at `p` with range `r` covers target `t` when
//! `(dr² + dc²) <= r²` and `t` is visible from `p`. Coverage of several
//! facilities is the plain union of the per-facility sets.

use crate::grid::*;
use crate::location::*;
use crate::visibility::visible;
use fnv::{FnvHashMap, FnvHashSet};
use itertools::iproduct;
use std::borrow::Cow;

pub type CoverageSet = FnvHashSet<Position>;

/// Target cells covered by a single facility.
pub fn coverage(grid: &Grid, facility: Position, range: u32) -> CoverageSet {
    // No in-grid offset exceeds the larger dimension.
    let reach = grid.rows().max(grid.cols()) as u32;
    let r = range.min(reach) as i32;
    let range_sq = range as u64 * range as u64;

    iproduct!(-r..=r, -r..=r)
        .filter_map(|(d_row, d_col)| facility.offset(d_row, d_col))
        .filter(|&cell| grid.is_target(cell))
        .filter(|&cell| facility.distance_sq_to(cell) <= range_sq)
        .filter(|&cell| visible(grid, facility, cell))
        .collect()
}

/// Union of the coverage of every facility.
pub fn total_coverage(grid: &Grid, facilities: &[Position], range: u32) -> CoverageSet {
    let mut covered = CoverageSet::default();
    for &facility in facilities {
        covered.extend(coverage(grid, facility, range));
    }
    covered
}

/// Number of cells in `cov` not already in `covered`.
pub fn marginal_coverage(cov: &CoverageSet, covered: &CoverageSet) -> usize {
    cov.iter().filter(|cell| !covered.contains(cell)).count()
}

/// Coverage of every open cell for one grid and range.
///
/// Built once when a placement search starts and dropped with it.
pub struct CoverageCache<'a> {
    grid: &'a Grid,
    range: u32,
    by_facility: FnvHashMap<Position, CoverageSet>,
}

impl<'a> CoverageCache<'a> {
    pub fn build(grid: &'a Grid, range: u32) -> Self {
        let by_facility = grid
            .open_cells()
            .map(|cell| (cell, coverage(grid, cell, range)))
            .collect();
        CoverageCache {
            grid,
            range,
            by_facility,
        }
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    /// Coverage of `facility`, computed on demand if it is not an open cell.
    pub fn get(&self, facility: Position) -> Cow<'_, CoverageSet> {
        match self.by_facility.get(&facility) {
            Some(cov) => Cow::Borrowed(cov),
            None => Cow::Owned(coverage(self.grid, facility, self.range)),
        }
    }

    pub fn union_of(&self, facilities: &[Position]) -> CoverageSet {
        let mut covered = CoverageSet::default();
        for &facility in facilities {
            covered.extend(self.get(facility).iter().copied());
        }
        covered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::wall_between;

    fn sorted(set: &CoverageSet) -> Vec<Position> {
        let mut cells: Vec<Position> = set.iter().copied().collect();
        cells.sort();
        cells
    }

    #[test]
    fn covers_targets_within_euclidean_disc() {
        let grid = Grid::from_symbols(&["R.R.R", ".....", "R.R.R"]).unwrap();
        let cov = coverage(&grid, Position::new(1, 2), 1);
        assert_eq!(sorted(&cov), vec![Position::new(0, 2), Position::new(2, 2)]);

        let cov = coverage(&grid, Position::new(0, 1), 1);
        assert_eq!(sorted(&cov), vec![Position::new(0, 0), Position::new(0, 2)]);

        // (1, 1) is diagonal-adjacent to four rooms; dr²+dc² = 2 > 1.
        let cov = coverage(&grid, Position::new(1, 1), 1);
        assert!(cov.is_empty());
        let cov = coverage(&grid, Position::new(1, 1), 2);
        assert_eq!(
            sorted(&cov),
            vec![
                Position::new(0, 0),
                Position::new(0, 2),
                Position::new(2, 0),
                Position::new(2, 2)
            ]
        );
    }

    #[test]
    fn walls_block_coverage() {
        let grid = Grid::from_symbols(&["R.W.R"]).unwrap();
        let cov = coverage(&grid, Position::new(0, 1), 3);
        assert_eq!(sorted(&cov), vec![Position::new(0, 0)]);
    }

    #[test]
    fn huge_range_is_bounded_by_the_grid() {
        let grid = Grid::from_symbols(&["R.W.R", "....."]).unwrap();
        for range in [1u32 << 31, u32::MAX, 100_000] {
            let cov = coverage(&grid, Position::new(0, 1), range);
            assert_eq!(sorted(&cov), vec![Position::new(0, 0)]);
        }
        let cov = coverage(&grid, Position::new(1, 4), u32::MAX);
        assert_eq!(sorted(&cov), vec![Position::new(0, 4)]);
    }

    #[test]
    fn off_axis_targets_are_not_covered() {
        // (1, 0) -> (0, 2) is within range 3 but not on a row, column or diagonal.
        let grid = Grid::from_symbols(&["..R", "..."]).unwrap();
        let cov = coverage(&grid, Position::new(1, 0), 3);
        assert!(cov.is_empty());
    }

    #[test]
    fn covered_cells_are_in_disc_and_visible() {
        let grid = Grid::from_symbols(&[
            "R.W.R.R", ".W.R...", "..R.W.R", "W..R..W", "R.R.R.R", ".W...W.",
        ])
        .unwrap();
        for facility in grid.open_cells() {
            for range in 1..4u32 {
                for cell in coverage(&grid, facility, range) {
                    assert!(grid.is_target(cell));
                    assert!(facility.distance_sq_to(cell) <= (range * range) as u64);
                    assert!(!wall_between(&grid, facility, cell));
                }
            }
        }
    }

    #[test]
    fn total_coverage_is_union() {
        let grid = Grid::from_symbols(&["R...R", ".....", "R...R"]).unwrap();
        let a = Position::new(0, 1);
        let b = Position::new(2, 3);
        let mut expected = coverage(&grid, a, 2);
        expected.extend(coverage(&grid, b, 2));
        assert_eq!(total_coverage(&grid, &[a, b], 2), expected);

        let cache = CoverageCache::build(&grid, 2);
        assert_eq!(cache.union_of(&[a, b]), expected);
    }

    #[test]
    fn marginal_counts_only_new_cells() {
        let cov: CoverageSet = [Position::new(0, 0), Position::new(0, 1)].into_iter().collect();
        let covered: CoverageSet = [Position::new(0, 1)].into_iter().collect();
        assert_eq!(marginal_coverage(&cov, &covered), 1);
    }
}
