//! Scoring functions consumed by best-first search.
//!
//! Heuristics are pure: the score depends only on the grid, the current
//! partial solution, the parameters and the candidate. They carry no
//! mutable state, so one value can be shared by concurrent searches.

use crate::constants::*;
use crate::coverage::*;
use crate::grid::*;
use crate::location::*;
use fnv::FnvHasher;
use pathfinding::directed::dijkstra::dijkstra_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Everything a placement heuristic may look at.
pub struct PlacementContext<'a> {
    pub grid: &'a Grid,
    /// Facilities placed before the candidate, in placement order.
    pub placed: &'a [Position],
    pub range: u32,
    pub candidate: Position,
    /// Coverage lookup for this grid and range.
    pub coverage: &'a CoverageCache<'a>,
}

/// Scores a candidate placement. Lower scores are explored first.
pub trait PlacementHeuristic: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, ctx: &PlacementContext) -> f64;
}

/// Scores every candidate 0, reducing best-first to uniform-cost order.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHeuristic;

impl PlacementHeuristic for NoHeuristic {
    fn name(&self) -> &str {
        "none"
    }

    fn evaluate(&self, _ctx: &PlacementContext) -> f64 {
        0.0
    }
}

/// Negative count of targets the candidate covers that no placed facility
/// already covers.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaximizeNewCoverage;

impl PlacementHeuristic for MaximizeNewCoverage {
    fn name(&self) -> &str {
        "maximize_new_coverage"
    }

    fn evaluate(&self, ctx: &PlacementContext) -> f64 {
        let covered = ctx.coverage.union_of(ctx.placed);
        let candidate = ctx.coverage.get(ctx.candidate);
        -(marginal_coverage(&candidate, &covered) as f64)
    }
}

/// Mean Euclidean distance from the grid center over all placed facilities
/// and the candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct Centrality;

impl PlacementHeuristic for Centrality {
    fn name(&self) -> &str {
        "centrality"
    }

    fn evaluate(&self, ctx: &PlacementContext) -> f64 {
        let (center_row, center_col) = ctx.grid.center();
        let distance = |pos: &Position| {
            let d_row = center_row - pos.row() as f64;
            let d_col = center_col - pos.col() as f64;
            (d_row * d_row + d_col * d_col).sqrt()
        };
        let total: f64 =
            ctx.placed.iter().map(distance).sum::<f64>() + distance(&ctx.candidate);
        total / (ctx.placed.len() + 1) as f64
    }
}

/// Uniform integer score in `RANDOM_SCORE_MIN..=RANDOM_SCORE_MAX`.
///
/// With a seed the score is derived from `(seed, placed, candidate)`, so the
/// same call always returns the same value. Without a seed each call draws
/// from the thread RNG.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomScore {
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RandomScore {
    pub fn with_seed(seed: u64) -> Self {
        RandomScore { seed: Some(seed) }
    }

    pub fn unseeded() -> Self {
        RandomScore { seed: None }
    }
}

impl PlacementHeuristic for RandomScore {
    fn name(&self) -> &str {
        "random"
    }

    fn evaluate(&self, ctx: &PlacementContext) -> f64 {
        let range = RANDOM_SCORE_MIN..=RANDOM_SCORE_MAX;
        let score = match self.seed {
            Some(seed) => {
                let mut hasher = FnvHasher::default();
                seed.hash(&mut hasher);
                ctx.placed.hash(&mut hasher);
                ctx.candidate.hash(&mut hasher);
                StdRng::seed_from_u64(hasher.finish()).random_range(range)
            }
            None => rand::rng().random_range(range),
        };
        score as f64
    }
}

/// Configuration-facing selection of a placement heuristic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    #[default]
    None,
    MaximizeNewCoverage,
    Centrality,
    Random(RandomScore),
}

impl PlacementHeuristic for HeuristicKind {
    fn name(&self) -> &str {
        match self {
            HeuristicKind::None => NoHeuristic.name(),
            HeuristicKind::MaximizeNewCoverage => MaximizeNewCoverage.name(),
            HeuristicKind::Centrality => Centrality.name(),
            HeuristicKind::Random(random) => random.name(),
        }
    }

    fn evaluate(&self, ctx: &PlacementContext) -> f64 {
        match self {
            HeuristicKind::None => NoHeuristic.evaluate(ctx),
            HeuristicKind::MaximizeNewCoverage => MaximizeNewCoverage.evaluate(ctx),
            HeuristicKind::Centrality => Centrality.evaluate(ctx),
            HeuristicKind::Random(random) => random.evaluate(ctx),
        }
    }
}

/// Estimates the remaining cost from `pos` to `destination`.
pub trait RouteHeuristic: Send + Sync {
    fn estimate(&self, grid: &Grid, pos: Position, destination: Position) -> f64;
}

/// Always 0. Admissible; A* behaves like uniform-cost search.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEstimate;

impl RouteHeuristic for NoEstimate {
    fn estimate(&self, _grid: &Grid, _pos: Position, _destination: Position) -> f64 {
        0.0
    }
}

/// Manhattan distance. Admissible for unit-cost 4-directional moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl RouteHeuristic for Manhattan {
    fn estimate(&self, _grid: &Grid, pos: Position, destination: Position) -> f64 {
        pos.manhattan_to(destination) as f64
    }
}

/// Penalises even columns as busy roads. Not admissible.
#[derive(Clone, Copy, Debug)]
pub struct ColumnTraffic {
    pub penalty: f64,
}

impl Default for ColumnTraffic {
    fn default() -> Self {
        ColumnTraffic {
            penalty: DEFAULT_TRAFFIC_PENALTY,
        }
    }
}

impl RouteHeuristic for ColumnTraffic {
    fn estimate(&self, _grid: &Grid, pos: Position, _destination: Position) -> f64 {
        if pos.col() % 2 == 0 {
            self.penalty
        } else {
            0.0
        }
    }
}

/// True remaining step count, precomputed by a reverse Dijkstra from the
/// destination. Cells that cannot reach the destination estimate infinity.
pub struct ExactDistance {
    destination: Position,
    distances: GridData<Option<u32>>,
}

impl ExactDistance {
    pub fn new(grid: &Grid, destination: Position, actions: &[(i32, i32)]) -> Self {
        let mut distances = GridData::new(grid, None);
        if grid.is_traversable(destination) {
            distances.set(destination, Some(0));
            let reached = dijkstra_all(&destination, |&pos: &Position| {
                actions
                    .iter()
                    .filter_map(move |&(d_row, d_col)| pos.offset(-d_row, -d_col))
                    .filter(|&prev| grid.is_traversable(prev))
                    .map(|prev| (prev, 1u32))
                    .collect::<Vec<_>>()
            });
            for (pos, (_parent, cost)) in reached {
                distances.set(pos, Some(cost));
            }
        }
        ExactDistance {
            destination,
            distances,
        }
    }

    pub fn distance(&self, pos: Position) -> Option<u32> {
        *self.distances.get(pos)
    }
}

impl RouteHeuristic for ExactDistance {
    fn estimate(&self, grid: &Grid, pos: Position, destination: Position) -> f64 {
        if destination != self.destination || !grid.contains(pos) {
            return 0.0;
        }
        self.distance(pos)
            .map(|d| d as f64)
            .unwrap_or(f64::INFINITY)
    }
}
