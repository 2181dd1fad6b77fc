//! Placement of coverage-providing facilities ("routers") over target cells.
//!
//! A state is an ordered list of facility positions plus the union of their
//! coverage. Expansion ranks every free open cell by the number of targets
//! it would newly cover, keeps the best `num_children` of them, and pushes
//! the resulting placements. Two orderings of the same set of positions are
//! one state: the fingerprint is the sorted position list, so each
//! combination is expanded at most once per search.
//!
//! A state at `max_depth` facilities is logged when popped but neither
//! goal-tested nor expanded, so every returned placement has fewer than
//! `max_depth` facilities.

use crate::constants::*;
use crate::coverage::*;
use crate::error::*;
use crate::frontier::placement_candidates;
use crate::grid::*;
use crate::heuristic::*;
use crate::location::*;
use crate::search::*;
use itertools::Itertools;
use log::*;
use std::cmp::Reverse;

/// Placement parameters with every default resolved against a grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPlacement {
    pub router_range: u32,
    /// Maximum successors pushed per expansion.
    pub num_children: usize,
    /// Placements with this many facilities are logged but never expanded
    /// or returned.
    pub max_depth: usize,
    pub h_factor: f64,
}

impl ResolvedPlacement {
    /// Validate parameters. `num_children` defaults to the grid's cell count.
    pub fn new(
        grid: &Grid,
        router_range: u32,
        num_children: Option<usize>,
        max_depth: usize,
        h_factor: f64,
    ) -> Result<Self> {
        if router_range == 0 {
            return Err(PlannerError::InvalidRange(router_range));
        }
        let num_children = num_children.unwrap_or_else(|| grid.cell_count());
        if num_children == 0 {
            return Err(PlannerError::InvalidBranching(num_children));
        }
        if max_depth == 0 {
            return Err(PlannerError::InvalidDepth(max_depth));
        }
        if !h_factor.is_finite() {
            return Err(PlannerError::Config(format!(
                "h_factor must be finite, got {}",
                h_factor
            )));
        }
        Ok(ResolvedPlacement {
            router_range,
            num_children,
            max_depth,
            h_factor,
        })
    }

    /// Defaults for everything but the range.
    pub fn with_range(grid: &Grid, router_range: u32) -> Result<Self> {
        ResolvedPlacement::new(grid, router_range, None, DEFAULT_MAX_DEPTH, DEFAULT_H_FACTOR)
    }
}

/// Facilities placed so far, in placement order, and what they cover.
#[derive(Clone, Debug)]
pub struct PlacementState {
    facilities: Vec<Position>,
    covered: CoverageSet,
}

impl PlacementState {
    pub fn empty() -> Self {
        PlacementState {
            facilities: Vec::new(),
            covered: CoverageSet::default(),
        }
    }

    /// Add a facility whose coverage is `coverage`.
    pub fn with_facility(&self, facility: Position, coverage: &CoverageSet) -> Self {
        let mut facilities = Vec::with_capacity(self.facilities.len() + 1);
        facilities.extend_from_slice(&self.facilities);
        facilities.push(facility);

        let mut covered = self.covered.clone();
        covered.extend(coverage.iter().copied());

        PlacementState {
            facilities,
            covered,
        }
    }

    pub fn facilities(&self) -> &[Position] {
        &self.facilities
    }

    pub fn covered(&self) -> &CoverageSet {
        &self.covered
    }
}

impl SearchState for PlacementState {
    type Fingerprint = Vec<Position>;

    fn fingerprint(&self) -> Vec<Position> {
        self.facilities.iter().copied().sorted().collect()
    }

    fn depth(&self) -> usize {
        self.facilities.len()
    }

    fn positions(&self) -> &[Position] {
        &self.facilities
    }
}

struct PlacementSearch<'a, H> {
    grid: &'a Grid,
    cache: CoverageCache<'a>,
    target_count: usize,
    params: &'a ResolvedPlacement,
    heuristic: &'a H,
}

impl<H: PlacementHeuristic> SearchProblem for PlacementSearch<'_, H> {
    type State = PlacementState;

    fn name(&self) -> &str {
        "placement"
    }

    fn initial_state(&self) -> PlacementState {
        PlacementState::empty()
    }

    fn is_goal(&self, state: &PlacementState) -> bool {
        // Coverage only ever contains target cells.
        state.covered.len() == self.target_count
    }

    fn successors(&self, state: &PlacementState) -> Vec<PlacementState> {
        placement_candidates(self.grid, &state.facilities)
            .into_iter()
            .map(|candidate| {
                let gain = marginal_coverage(&self.cache.get(candidate), &state.covered);
                (candidate, gain)
            })
            .sorted_by_key(|&(_, gain)| Reverse(gain))
            .take(self.params.num_children)
            .map(|(candidate, _)| state.with_facility(candidate, &self.cache.get(candidate)))
            .collect()
    }

    fn estimate(&self, parent: &PlacementState, child: &PlacementState) -> f64 {
        let candidate = match child.facilities.last() {
            Some(&candidate) => candidate,
            None => return 0.0,
        };
        let ctx = PlacementContext {
            grid: self.grid,
            placed: &parent.facilities,
            range: self.params.router_range,
            candidate,
            coverage: &self.cache,
        };
        self.heuristic.evaluate(&ctx)
    }

    fn depth_cap(&self, _strategy: Strategy) -> Option<usize> {
        Some(self.params.max_depth)
    }

    fn cap_before_goal(&self) -> bool {
        true
    }
}

/// Search for a placement covering every target cell.
///
/// `heuristic` only affects best-first ordering; breadth-first and
/// depth-first ignore it. Returns `None` if no placement within the depth
/// and branching bounds covers every target.
pub fn search<H: PlacementHeuristic>(
    grid: &Grid,
    params: &ResolvedPlacement,
    strategy: Strategy,
    heuristic: &H,
) -> Option<Solution> {
    let cache = CoverageCache::build(grid, params.router_range);
    let target_count = grid.targets().count();
    debug!(
        "placement: {:?} with {} over {} targets, range={}, num_children={}, max_depth={}",
        strategy,
        heuristic.name(),
        target_count,
        params.router_range,
        params.num_children,
        params.max_depth
    );

    let problem = PlacementSearch {
        grid,
        cache,
        target_count,
        params,
        heuristic,
    };
    SearchEngine::new(&problem, strategy)
        .with_h_factor(params.h_factor)
        .run()
}

pub fn bfs(grid: &Grid, params: &ResolvedPlacement) -> Option<Solution> {
    search(grid, params, Strategy::BreadthFirst, &NoHeuristic)
}

/// Best-first placement with `f = facilities + h * h_factor`.
pub fn astar<H: PlacementHeuristic>(
    grid: &Grid,
    params: &ResolvedPlacement,
    heuristic: &H,
) -> Option<Solution> {
    search(grid, params, Strategy::BestFirst, heuristic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_rejects_bad_parameters() {
        let grid = Grid::from_symbols(&["R.."]).unwrap();
        assert!(matches!(
            ResolvedPlacement::new(&grid, 0, None, 4, 1.0),
            Err(PlannerError::InvalidRange(0))
        ));
        assert!(matches!(
            ResolvedPlacement::new(&grid, 1, Some(0), 4, 1.0),
            Err(PlannerError::InvalidBranching(0))
        ));
        assert!(matches!(
            ResolvedPlacement::new(&grid, 1, None, 0, 1.0),
            Err(PlannerError::InvalidDepth(0))
        ));
        assert!(ResolvedPlacement::new(&grid, 1, None, 4, f64::NAN).is_err());
        assert_eq!(ResolvedPlacement::with_range(&grid, 1).unwrap().num_children, 3);
    }

    #[test]
    fn fingerprint_ignores_order() {
        let a = Position::new(0, 1);
        let b = Position::new(2, 0);
        let empty = CoverageSet::default();
        let ab = PlacementState::empty()
            .with_facility(a, &empty)
            .with_facility(b, &empty);
        let ba = PlacementState::empty()
            .with_facility(b, &empty)
            .with_facility(a, &empty);
        assert_eq!(ab.fingerprint(), ba.fingerprint());
        assert_ne!(ab.positions(), ba.positions());
    }

    #[test]
    fn no_targets_is_solved_by_empty_placement() {
        let grid = Grid::from_symbols(&["...", "..."]).unwrap();
        let params = ResolvedPlacement::with_range(&grid, 1).unwrap();
        let solution = bfs(&grid, &params).unwrap();
        assert!(solution.positions.is_empty());
        assert_eq!(solution.nodes_expanded, 1);
    }

    #[test]
    fn single_router_covers_row() {
        let grid = Grid::from_symbols(&["R.R"]).unwrap();
        let params = ResolvedPlacement::with_range(&grid, 1).unwrap();
        let solution = bfs(&grid, &params).unwrap();
        assert_eq!(solution.positions, vec![Position::new(0, 1)]);
        assert_eq!(
            solution.explored_paths,
            vec![vec![], vec![Position::new(0, 1)]]
        );
    }

    #[test]
    fn placement_at_max_depth_is_never_returned() {
        let grid = Grid::from_symbols(&["R.W.R"]).unwrap();
        let params = ResolvedPlacement::new(&grid, 1, None, 2, 1.0).unwrap();
        assert!(bfs(&grid, &params).is_none());
        assert!(astar(&grid, &params, &MaximizeNewCoverage).is_none());

        let params = ResolvedPlacement::new(&grid, 1, None, 3, 1.0).unwrap();
        let solution = bfs(&grid, &params).unwrap();
        assert_eq!(solution.positions, vec![Position::new(0, 1), Position::new(0, 3)]);
    }
}
