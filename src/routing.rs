//! Shortest-path routing of a single agent through an obstacle grid.
//!
//! All four traversal orders run on the shared [`SearchEngine`]:
//!
//! - Breadth-first and depth-first test successors for the goal as they are
//!   generated, and `[start]` is returned without any expansion when the
//!   start is the destination.
//! - The depth limit only applies to depth-first search. Breadth-first
//!   accepts a limit and ignores it; it already expands in non-decreasing
//!   depth order.
//! - Iterative deepening runs bounded depth-first search with limits
//!   `0, 1, 2, ..` up to the grid's cell count and reports the limit that
//!   succeeded, which is always the number of moves in the returned path.
//! - A* tests states for the goal when they are popped, so an admissible
//!   estimate yields a shortest path.

use crate::error::*;
use crate::frontier::routing_successors;
use crate::grid::*;
use crate::heuristic::*;
use crate::location::*;
use crate::search::*;
use log::*;
use std::sync::Arc;

/// Start, destination, action set and the grid to route through.
#[derive(Clone, Debug)]
pub struct RoutingProblem {
    start: Position,
    destination: Position,
    actions: Vec<(i32, i32)>,
    grid: Arc<Grid>,
}

impl RoutingProblem {
    /// Fails if start or destination lie outside the grid, or if an action
    /// is the zero offset.
    pub fn new(
        grid: impl Into<Arc<Grid>>,
        start: Position,
        destination: Position,
        actions: &[(i32, i32)],
    ) -> Result<Self> {
        let grid = grid.into();
        grid.check_bounds(start)?;
        grid.check_bounds(destination)?;
        if let Some(&(d_row, d_col)) = actions.iter().find(|&&action| action == (0, 0)) {
            return Err(PlannerError::InvalidAction { d_row, d_col });
        }
        Ok(RoutingProblem {
            start,
            destination,
            actions: actions.to_vec(),
            grid,
        })
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn destination(&self) -> Position {
        self.destination
    }

    pub fn actions(&self) -> &[(i32, i32)] {
        &self.actions
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// True if every step of `path` is one action from its predecessor onto
    /// a traversable cell, from start to destination.
    pub fn is_valid_path(&self, path: &[Position]) -> bool {
        path.first() == Some(&self.start)
            && path.last() == Some(&self.destination)
            && path.iter().all(|&pos| self.grid.is_traversable(pos))
            && path
                .windows(2)
                .all(|step| self.actions.contains(&step[0].delta_to(step[1])))
    }
}

/// An agent position together with the path that reached it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathState {
    path: Vec<Position>,
}

impl PathState {
    fn start(pos: Position) -> Self {
        PathState { path: vec![pos] }
    }

    pub fn position(&self) -> Position {
        self.path[self.path.len() - 1]
    }

    fn step(&self, next: Position) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(next);
        PathState { path }
    }
}

impl SearchState for PathState {
    type Fingerprint = Position;

    fn fingerprint(&self) -> Position {
        self.position()
    }

    fn depth(&self) -> usize {
        self.path.len() - 1
    }

    fn positions(&self) -> &[Position] {
        &self.path
    }
}

struct RouteSearch<'a, H> {
    problem: &'a RoutingProblem,
    heuristic: &'a H,
    depth_limit: Option<usize>,
}

impl<H: RouteHeuristic> SearchProblem for RouteSearch<'_, H> {
    type State = PathState;

    fn name(&self) -> &str {
        "routing"
    }

    fn initial_state(&self) -> PathState {
        PathState::start(self.problem.start)
    }

    fn is_goal(&self, state: &PathState) -> bool {
        state.position() == self.problem.destination
    }

    fn successors(&self, state: &PathState) -> Vec<PathState> {
        routing_successors(&self.problem.grid, state.position(), &self.problem.actions)
            .into_iter()
            .map(|next| state.step(next))
            .collect()
    }

    fn estimate(&self, _parent: &PathState, child: &PathState) -> f64 {
        self.heuristic
            .estimate(&self.problem.grid, child.position(), self.problem.destination)
    }

    fn goal_test(&self, strategy: Strategy) -> GoalTest {
        match strategy {
            Strategy::BreadthFirst | Strategy::DepthFirst => GoalTest::OnGeneration,
            Strategy::BestFirst => GoalTest::OnExpansion,
        }
    }

    fn depth_cap(&self, strategy: Strategy) -> Option<usize> {
        match strategy {
            Strategy::DepthFirst => self.depth_limit,
            Strategy::BreadthFirst | Strategy::BestFirst => None,
        }
    }

    fn reopens(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::BestFirst => true,
            Strategy::DepthFirst => self.depth_limit.is_some(),
            Strategy::BreadthFirst => false,
        }
    }
}

/// Iterative-deepening result: the solution and the depth limit that found it.
#[derive(Clone, Debug, PartialEq)]
pub struct DeepeningSolution {
    pub solution: Solution,
    pub depth: usize,
}

/// Breadth-first (`breadth_first == true`) or depth-first routing.
/// `depth_limit` is ignored in breadth-first mode.
pub fn bfs_dfs(
    problem: &RoutingProblem,
    breadth_first: bool,
    depth_limit: Option<usize>,
) -> Option<Solution> {
    let strategy = if breadth_first {
        if depth_limit.is_some() {
            debug!("routing: depth limit {:?} ignored by breadth-first search", depth_limit);
        }
        Strategy::BreadthFirst
    } else {
        Strategy::DepthFirst
    };
    let search = RouteSearch {
        problem,
        heuristic: &NoEstimate,
        depth_limit,
    };
    SearchEngine::new(&search, strategy).run()
}

pub fn bfs(problem: &RoutingProblem) -> Option<Solution> {
    bfs_dfs(problem, true, None)
}

/// Depth-first routing. With a limit, states at that depth are not expanded,
/// so any returned path has at most `depth_limit` moves.
pub fn dfs(problem: &RoutingProblem, depth_limit: Option<usize>) -> Option<Solution> {
    bfs_dfs(problem, false, depth_limit)
}

/// Iterative deepening over depth limits `0..=cell_count`.
///
/// `explored_paths` and `nodes_expanded` accumulate over every iteration.
pub fn ids(problem: &RoutingProblem) -> Option<DeepeningSolution> {
    let max_depth = problem.grid.cell_count();
    let mut explored_paths = Vec::new();
    let mut nodes_expanded = 0;

    for depth in 0..=max_depth {
        let search = RouteSearch {
            problem,
            heuristic: &NoEstimate,
            depth_limit: Some(depth),
        };
        let mut engine = SearchEngine::new(&search, Strategy::DepthFirst);
        let found = engine.search();
        nodes_expanded += engine.stats().nodes_expanded;
        explored_paths.extend(engine.take_explored());

        if let Some(positions) = found {
            debug!(
                "routing: iterative deepening found a {}-move path at depth {}",
                positions.len() - 1,
                depth
            );
            return Some(DeepeningSolution {
                solution: Solution {
                    positions,
                    explored_paths,
                    nodes_expanded,
                },
                depth,
            });
        }
    }

    debug!(
        "routing: iterative deepening exhausted at depth {} after {} expansions",
        max_depth, nodes_expanded
    );
    None
}

/// A* with `f = g + h * h_factor`, unit cost per move.
pub fn astar<H: RouteHeuristic>(
    problem: &RoutingProblem,
    heuristic: &H,
    h_factor: f64,
) -> Option<Solution> {
    let search = RouteSearch {
        problem,
        heuristic,
        depth_limit: None,
    };
    SearchEngine::new(&search, Strategy::BestFirst)
        .with_h_factor(h_factor)
        .run()
}
