//! Search configuration, loadable from TOML.
//!
//! ```
//! use grid_planner::config::SearchConfig;
//! use grid_planner::heuristic::HeuristicKind;
//!
//! let config = SearchConfig::from_toml_str(r#"
//!     [routing]
//!     depth_limit = 12
//!
//!     [placement]
//!     router_range = 3
//!     num_children = 5
//!     heuristic = "centrality"
//! "#).unwrap();
//!
//! assert_eq!(config.routing.depth_limit, Some(12));
//! assert_eq!(config.placement.router_range, 3);
//! assert_eq!(config.placement.max_depth, 4);
//! assert_eq!(config.placement.heuristic, HeuristicKind::Centrality);
//! ```
//!
//! Grid-dependent defaults (the branching cap defaults to the grid's cell
//! count) are filled in by [`PlacementConfig::resolve`] when a search starts.

use crate::constants::*;
use crate::error::*;
use crate::grid::Grid;
use crate::heuristic::{HeuristicKind, RouteHeuristic};
use crate::placement::ResolvedPlacement;
use crate::routing::{self, RoutingProblem};
use crate::search::{Solution, Strategy};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub placement: PlacementConfig,
}

impl SearchConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Depth bound for depth-first routing. Breadth-first ignores it.
    #[serde(default)]
    pub depth_limit: Option<usize>,
    #[serde(default = "default_h_factor")]
    pub h_factor: f64,
}

impl RoutingConfig {
    /// Route with `strategy`. The depth limit reaches depth-first search
    /// only; `heuristic` and `h_factor` only affect best-first.
    pub fn run<H: RouteHeuristic>(
        &self,
        problem: &RoutingProblem,
        strategy: Strategy,
        heuristic: &H,
    ) -> Option<Solution> {
        match strategy {
            Strategy::BreadthFirst => routing::bfs_dfs(problem, true, self.depth_limit),
            Strategy::DepthFirst => routing::bfs_dfs(problem, false, self.depth_limit),
            Strategy::BestFirst => routing::astar(problem, heuristic, self.h_factor),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig {
            depth_limit: None,
            h_factor: DEFAULT_H_FACTOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    #[serde(default = "default_router_range")]
    pub router_range: u32,
    /// Successors kept per expansion. `None` keeps every candidate.
    #[serde(default)]
    pub num_children: Option<usize>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_h_factor")]
    pub h_factor: f64,
    #[serde(default)]
    pub heuristic: HeuristicKind,
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        PlacementConfig {
            router_range: DEFAULT_ROUTER_RANGE,
            num_children: None,
            max_depth: DEFAULT_MAX_DEPTH,
            h_factor: DEFAULT_H_FACTOR,
            heuristic: HeuristicKind::default(),
            strategy: Strategy::default(),
        }
    }
}

impl PlacementConfig {
    pub fn resolve(&self, grid: &Grid) -> Result<ResolvedPlacement> {
        ResolvedPlacement::new(
            grid,
            self.router_range,
            self.num_children,
            self.max_depth,
            self.h_factor,
        )
    }
}

fn default_h_factor() -> f64 {
    DEFAULT_H_FACTOR
}

fn default_router_range() -> u32 {
    DEFAULT_ROUTER_RANGE
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NEIGHBORS_4;
    use crate::heuristic::{Manhattan, RandomScore};
    use crate::location::Position;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SearchConfig::from_toml_str("").unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.placement.strategy, Strategy::BestFirst);
        assert_eq!(config.routing.h_factor, 1.0);
    }

    #[test]
    fn parses_random_heuristic_with_seed() {
        let config = SearchConfig::from_toml_str(
            r#"
            [placement]
            strategy = "breadth_first"
            h_factor = 0.5
            heuristic = { random = { seed = 7 } }
            "#,
        )
        .unwrap();
        assert_eq!(config.placement.strategy, Strategy::BreadthFirst);
        assert_eq!(config.placement.h_factor, 0.5);
        assert_eq!(
            config.placement.heuristic,
            HeuristicKind::Random(RandomScore::with_seed(7))
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SearchConfig::from_toml_str("[placement]\nrouter_range = -1\n").unwrap_err();
        assert!(matches!(err, PlannerError::Toml(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SearchConfig::from_toml_file("no/such/dir/planner.toml").unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }

    #[test]
    fn routing_section_drives_searches() {
        let config = SearchConfig::from_toml_str("[routing]\ndepth_limit = 2\n").unwrap();
        let grid = Grid::from_occupancy(&[vec![0, 0, 0, 0]]).unwrap();
        let problem =
            RoutingProblem::new(grid, Position::new(0, 0), Position::new(0, 3), &NEIGHBORS_4)
                .unwrap();

        let routing = &config.routing;
        assert!(routing
            .run(&problem, Strategy::DepthFirst, &Manhattan)
            .is_none());
        let breadth = routing
            .run(&problem, Strategy::BreadthFirst, &Manhattan)
            .unwrap();
        assert_eq!(breadth.positions.len(), 4);
        let best = routing.run(&problem, Strategy::BestFirst, &Manhattan).unwrap();
        assert_eq!(best.positions, breadth.positions);

        let deeper = RoutingConfig {
            depth_limit: Some(3),
            ..routing.clone()
        };
        assert!(deeper.run(&problem, Strategy::DepthFirst, &Manhattan).is_some());
    }

    #[test]
    fn resolve_fills_grid_defaults() {
        let grid = Grid::from_symbols(&["R..", "..R"]).unwrap();
        let resolved = PlacementConfig::default().resolve(&grid).unwrap();
        assert_eq!(resolved.num_children, 6);
        assert_eq!(resolved.max_depth, DEFAULT_MAX_DEPTH);

        let zero_range = PlacementConfig {
            router_range: 0,
            ..PlacementConfig::default()
        };
        assert!(matches!(
            zero_range.resolve(&grid),
            Err(PlannerError::InvalidRange(0))
        ));
    }
}
