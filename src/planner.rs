//! Public entry point for placement searches.
//!
//! `PlacementPlanner` is a fluent builder over a borrowed grid. Parameters
//! are resolved and validated once when a search starts. `sweep` runs one
//! independent search per parameter combination in parallel; the grid is
//! only ever read, so the runs share it without synchronization.

use crate::config::PlacementConfig;
use crate::error::*;
use crate::grid::Grid;
use crate::heuristic::*;
use crate::placement;
use crate::search::{Solution, Strategy};
use itertools::iproduct;
use log::*;
use rayon::prelude::*;
use serde::Serialize;

pub struct PlacementPlanner<'g> {
    grid: &'g Grid,
    config: PlacementConfig,
}

impl<'g> PlacementPlanner<'g> {
    /// Start with default parameters.
    pub fn new(grid: &'g Grid) -> Self {
        PlacementPlanner {
            grid,
            config: PlacementConfig::default(),
        }
    }

    pub fn from_config(grid: &'g Grid, config: &PlacementConfig) -> Self {
        PlacementPlanner {
            grid,
            config: config.clone(),
        }
    }

    pub fn router_range(mut self, range: u32) -> Self {
        self.config.router_range = range;
        self
    }

    /// Cap on successors pushed per expansion (default: every cell).
    pub fn num_children(mut self, num_children: usize) -> Self {
        self.config.num_children = Some(num_children);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn h_factor(mut self, h_factor: f64) -> Self {
        self.config.h_factor = h_factor;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn heuristic(mut self, heuristic: HeuristicKind) -> Self {
        self.config.heuristic = heuristic;
        self
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Run with the configured heuristic.
    pub fn run(&self) -> Result<Option<Solution>> {
        self.run_with(&self.config.heuristic)
    }

    /// Run with a caller-supplied heuristic in place of the configured one.
    pub fn run_with<H: PlacementHeuristic>(&self, heuristic: &H) -> Result<Option<Solution>> {
        let params = self.config.resolve(self.grid)?;
        Ok(placement::search(
            self.grid,
            &params,
            self.config.strategy,
            heuristic,
        ))
    }

    /// Run one search per `(h_factor, num_children)` pair, in parallel.
    ///
    /// Results come back in input order, `h_factors`-major. Every
    /// combination is validated before any search starts.
    pub fn sweep(
        &self,
        h_factors: &[f64],
        branching: &[Option<usize>],
    ) -> Result<Vec<SweepResult>> {
        let runs = iproduct!(h_factors.iter().copied(), branching.iter().copied())
            .map(|(h_factor, num_children)| {
                let config = PlacementConfig {
                    h_factor,
                    num_children,
                    ..self.config.clone()
                };
                config.resolve(self.grid).map(|params| (config, params))
            })
            .collect::<Result<Vec<_>>>()?;

        let grid = self.grid;
        let results: Vec<SweepResult> = runs
            .par_iter()
            .map(|(config, params)| SweepResult {
                h_factor: config.h_factor,
                num_children: config.num_children,
                solution: placement::search(grid, params, config.strategy, &config.heuristic),
            })
            .collect();

        info!(
            "sweep: {} runs, {} solved",
            results.len(),
            results.iter().filter(|r| r.solution.is_some()).count()
        );
        Ok(results)
    }
}

/// Outcome of one run of a parameter sweep.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SweepResult {
    pub h_factor: f64,
    pub num_children: Option<usize>,
    pub solution: Option<Solution>,
}

impl SweepResult {
    pub fn facility_count(&self) -> Option<usize> {
        self.solution.as_ref().map(|s| s.positions.len())
    }

    pub fn nodes_expanded(&self) -> Option<usize> {
        self.solution.as_ref().map(|s| s.nodes_expanded)
    }
}
