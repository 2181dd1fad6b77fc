//! Generic state-space search shared by the routing and placement problems.
//!
//! A [`SearchProblem`] supplies the initial state, successor generation, the
//! goal test and an optional estimate. The [`SearchEngine`] owns everything
//! else for the duration of one call: the frontier container, the visited
//! set keyed by state fingerprint, the explored-state log and counters.
//! Nothing outlives the call.

use crate::location::*;
use fnv::FnvHashMap;
use log::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};
use std::hash::Hash;

/// Traversal order of the frontier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// FIFO frontier.
    BreadthFirst,
    /// LIFO frontier.
    DepthFirst,
    /// Min-heap frontier keyed by `g + h * h_factor`.
    #[default]
    BestFirst,
}

/// When the goal test is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalTest {
    /// Successors are tested as they are generated, before they are pushed.
    /// The initial state is tested before any expansion.
    OnGeneration,
    /// States are tested when popped from the frontier.
    OnExpansion,
}

/// A node of the search tree.
pub trait SearchState {
    /// Canonical key for duplicate detection. Equal problem-relevant state
    /// must give equal fingerprints.
    type Fingerprint: Eq + Hash;

    fn fingerprint(&self) -> Self::Fingerprint;

    fn depth(&self) -> usize;

    /// Accumulated cost `g`. Uniform problems use the depth.
    fn cost(&self) -> f64 {
        self.depth() as f64
    }

    /// The path (routing) or ordered placement list (placement) this state
    /// represents. This is what the explored log and the solution record.
    fn positions(&self) -> &[Position];
}

pub trait SearchProblem {
    type State: SearchState;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn initial_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Successors of `state`, already filtered, ranked and capped, in the
    /// order they should be pushed.
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;

    /// Heuristic estimate `h` for `child`, reached from `parent`.
    fn estimate(&self, _parent: &Self::State, _child: &Self::State) -> f64 {
        0.0
    }

    fn goal_test(&self, _strategy: Strategy) -> GoalTest {
        GoalTest::OnExpansion
    }

    /// States at or beyond this depth are logged when popped but not expanded.
    fn depth_cap(&self, _strategy: Strategy) -> Option<usize> {
        None
    }

    /// Whether a popped state at the depth cap is skipped before the
    /// expansion-time goal test, so a capped state is never returned.
    fn cap_before_goal(&self) -> bool {
        false
    }

    /// Whether a fingerprint already seen may be pushed again when it is
    /// reached with strictly lower cost.
    fn reopens(&self, strategy: Strategy) -> bool {
        strategy == Strategy::BestFirst
    }
}

/// A discovered solution plus search diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// The path to the destination, or the ordered facility placements.
    pub positions: Vec<Position>,
    /// Every expanded state, in expansion order.
    pub explored_paths: Vec<Vec<Position>>,
    pub nodes_expanded: usize,
}

/// Counters for one search call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub nodes_generated: usize,
    pub depth_capped: usize,
    pub stale_skipped: usize,
    pub frontier_len: usize,
    pub visited_len: usize,
}

/// Frontier containers.
pub enum Frontier<N> {
    Fifo(VecDeque<N>),
    Lifo(Vec<N>),
    Priority {
        heap: BinaryHeap<Prioritized<N>>,
        sequence: u64,
    },
}

impl<N> Frontier<N> {
    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BreadthFirst => Frontier::Fifo(VecDeque::new()),
            Strategy::DepthFirst => Frontier::Lifo(Vec::new()),
            Strategy::BestFirst => Frontier::Priority {
                heap: BinaryHeap::new(),
                sequence: 0,
            },
        }
    }

    /// Push a node. `priority` is only used by the priority frontier.
    pub fn push(&mut self, node: N, priority: f64) {
        match self {
            Frontier::Fifo(queue) => queue.push_back(node),
            Frontier::Lifo(stack) => stack.push(node),
            Frontier::Priority { heap, sequence } => {
                heap.push(Prioritized {
                    priority,
                    sequence: *sequence,
                    node,
                });
                *sequence += 1;
            }
        }
    }

    pub fn pop(&mut self) -> Option<N> {
        match self {
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Priority { heap, .. } => heap.pop().map(|entry| entry.node),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Lifo(stack) => stack.len(),
            Frontier::Priority { heap, .. } => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Heap entry ordered so the lowest priority pops first; equal priorities
/// pop in insertion order.
pub struct Prioritized<N> {
    priority: f64,
    sequence: u64,
    node: N,
}

impl<N> Ord for Prioritized<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<N> PartialOrd for Prioritized<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> PartialEq for Prioritized<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for Prioritized<N> {}

/// Fingerprint -> lowest cost it has been pushed with.
pub struct VisitedSet<K> {
    best: FnvHashMap<K, f64>,
}

impl<K: Eq + Hash> Default for VisitedSet<K> {
    fn default() -> Self {
        VisitedSet {
            best: FnvHashMap::default(),
        }
    }
}

impl<K: Eq + Hash> VisitedSet<K> {
    /// Record `key` at `cost`. Returns true if the state should be pushed:
    /// the key is new, or `reopen` is set and `cost` beats the recorded cost.
    pub fn admit(&mut self, key: K, cost: f64, reopen: bool) -> bool {
        match self.best.get(&key) {
            None => {
                self.best.insert(key, cost);
                true
            }
            Some(&best) if reopen && cost < best => {
                self.best.insert(key, cost);
                true
            }
            Some(_) => false,
        }
    }

    /// True if `key` has since been pushed with a lower cost than `cost`.
    pub fn is_stale(&self, key: &K, cost: f64) -> bool {
        self.best.get(key).map(|&best| best < cost).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

type FingerprintOf<P> = <<P as SearchProblem>::State as SearchState>::Fingerprint;

/// Drives one search over a problem with a fixed strategy.
pub struct SearchEngine<'p, P: SearchProblem> {
    problem: &'p P,
    strategy: Strategy,
    h_factor: f64,
    frontier: Frontier<P::State>,
    visited: VisitedSet<FingerprintOf<P>>,
    explored_paths: Vec<Vec<Position>>,
    stats: SearchStats,
}

impl<'p, P: SearchProblem> SearchEngine<'p, P> {
    pub fn new(problem: &'p P, strategy: Strategy) -> Self {
        SearchEngine {
            problem,
            strategy,
            h_factor: crate::constants::DEFAULT_H_FACTOR,
            frontier: Frontier::for_strategy(strategy),
            visited: VisitedSet::default(),
            explored_paths: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Multiplier on the heuristic estimate (best-first only).
    pub fn with_h_factor(mut self, h_factor: f64) -> Self {
        self.h_factor = h_factor;
        self
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            frontier_len: self.frontier.len(),
            visited_len: self.visited.len(),
            ..self.stats
        }
    }

    /// Take the explored log, leaving it empty.
    pub fn take_explored(&mut self) -> Vec<Vec<Position>> {
        std::mem::take(&mut self.explored_paths)
    }

    /// Run to completion and package the result.
    pub fn run(mut self) -> Option<Solution> {
        let positions = self.search()?;
        Some(Solution {
            positions,
            nodes_expanded: self.stats.nodes_expanded,
            explored_paths: self.explored_paths,
        })
    }

    /// Run until a goal is found or the frontier is exhausted. Returns the
    /// goal state's positions. The engine is spent afterwards.
    pub fn search(&mut self) -> Option<Vec<Position>> {
        let problem = self.problem;
        let goal_test = problem.goal_test(self.strategy);
        let depth_cap = problem.depth_cap(self.strategy);
        let reopen = problem.reopens(self.strategy);
        let cap_first = problem.cap_before_goal();
        let capped = |depth: usize| depth_cap.is_some_and(|cap| depth >= cap);

        let initial = problem.initial_state();
        if goal_test == GoalTest::OnGeneration && problem.is_goal(&initial) {
            return Some(self.finish(&initial));
        }
        self.visited.admit(initial.fingerprint(), initial.cost(), reopen);
        let priority = initial.cost();
        self.frontier.push(initial, priority);

        while let Some(state) = self.frontier.pop() {
            if reopen && self.visited.is_stale(&state.fingerprint(), state.cost()) {
                self.stats.stale_skipped += 1;
                continue;
            }

            self.stats.nodes_expanded += 1;
            self.explored_paths.push(state.positions().to_vec());
            trace!(
                "{} expanding depth={} g={} {:?}",
                problem.name(),
                state.depth(),
                state.cost(),
                state.positions()
            );

            let at_cap = capped(state.depth());
            if at_cap && cap_first {
                self.stats.depth_capped += 1;
                continue;
            }

            if goal_test == GoalTest::OnExpansion && problem.is_goal(&state) {
                return Some(self.finish(&state));
            }

            if at_cap {
                self.stats.depth_capped += 1;
                continue;
            }

            for child in problem.successors(&state) {
                self.stats.nodes_generated += 1;

                if goal_test == GoalTest::OnGeneration && problem.is_goal(&child) {
                    return Some(self.finish(&child));
                }

                if !self.visited.admit(child.fingerprint(), child.cost(), reopen) {
                    continue;
                }

                let priority = match self.strategy {
                    Strategy::BestFirst => {
                        child.cost() + self.h_factor * problem.estimate(&state, &child)
                    }
                    Strategy::BreadthFirst | Strategy::DepthFirst => 0.0,
                };
                self.frontier.push(child, priority);
            }
        }

        let stats = self.stats();
        debug!(
            "{} {:?} exhausted: expanded={}, generated={}, depth_capped={}, visited={}",
            problem.name(),
            self.strategy,
            stats.nodes_expanded,
            stats.nodes_generated,
            stats.depth_capped,
            stats.visited_len
        );
        None
    }

    fn finish(&self, goal: &P::State) -> Vec<Position> {
        let stats = self.stats();
        debug!(
            "{} {:?} reached goal at depth {}: expanded={}, generated={}, frontier={}",
            self.problem.name(),
            self.strategy,
            goal.depth(),
            stats.nodes_expanded,
            stats.nodes_generated,
            stats.frontier_len
        );
        goal.positions().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts upward along a line; the goal is a fixed value.
    struct LineProblem {
        goal: u16,
        limit: u16,
        cap: Option<usize>,
        cap_first: bool,
    }

    impl LineProblem {
        fn new(goal: u16, limit: u16) -> Self {
            LineProblem {
                goal,
                limit,
                cap: None,
                cap_first: false,
            }
        }
    }

    #[derive(Clone)]
    struct LineState {
        path: Vec<Position>,
    }

    impl SearchState for LineState {
        type Fingerprint = Position;

        fn fingerprint(&self) -> Position {
            *self.path.last().unwrap()
        }

        fn depth(&self) -> usize {
            self.path.len() - 1
        }

        fn positions(&self) -> &[Position] {
            &self.path
        }
    }

    impl SearchProblem for LineProblem {
        type State = LineState;

        fn name(&self) -> &str {
            "line"
        }

        fn initial_state(&self) -> LineState {
            LineState {
                path: vec![Position::new(0, 0)],
            }
        }

        fn is_goal(&self, state: &LineState) -> bool {
            state.fingerprint().col() == self.goal
        }

        fn successors(&self, state: &LineState) -> Vec<LineState> {
            let col = state.fingerprint().col();
            (col + 1..=(col + 2).min(self.limit))
                .map(|next| {
                    let mut path = state.path.clone();
                    path.push(Position::new(0, next));
                    LineState { path }
                })
                .collect()
        }

        fn depth_cap(&self, _strategy: Strategy) -> Option<usize> {
            self.cap
        }

        fn cap_before_goal(&self) -> bool {
            self.cap_first
        }
    }

    #[test]
    fn priority_frontier_pops_lowest_then_oldest() {
        let mut frontier = Frontier::for_strategy(Strategy::BestFirst);
        frontier.push("b", 2.0);
        frontier.push("a1", 1.0);
        frontier.push("a2", 1.0);
        frontier.push("c", 3.0);
        assert_eq!(frontier.pop(), Some("a1"));
        assert_eq!(frontier.pop(), Some("a2"));
        assert_eq!(frontier.pop(), Some("b"));
        assert_eq!(frontier.pop(), Some("c"));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn fifo_and_lifo_frontiers() {
        let mut fifo = Frontier::for_strategy(Strategy::BreadthFirst);
        let mut lifo = Frontier::for_strategy(Strategy::DepthFirst);
        for i in 0..3 {
            fifo.push(i, 0.0);
            lifo.push(i, 0.0);
        }
        assert_eq!(fifo.pop(), Some(0));
        assert_eq!(lifo.pop(), Some(2));
        assert_eq!(fifo.len(), 2);
        assert!(!lifo.is_empty());
    }

    #[test]
    fn visited_set_reopens_only_on_lower_cost() {
        let mut visited = VisitedSet::default();
        assert!(visited.is_empty());
        assert!(visited.admit(1, 5.0, true));
        assert!(!visited.admit(1, 5.0, true));
        assert!(!visited.admit(1, 3.0, false));
        assert!(visited.admit(1, 3.0, true));
        assert!(visited.is_stale(&1, 5.0));
        assert!(!visited.is_stale(&1, 3.0));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn breadth_first_finds_shortest_line() {
        let problem = LineProblem::new(5, 10);
        let solution = SearchEngine::new(&problem, Strategy::BreadthFirst)
            .run()
            .unwrap();
        assert_eq!(solution.positions.len(), 4);
        assert_eq!(solution.nodes_expanded, solution.explored_paths.len());
        assert_eq!(solution.explored_paths[0], vec![Position::new(0, 0)]);
    }

    #[test]
    fn exhaustion_returns_none() {
        let problem = LineProblem::new(20, 10);
        for strategy in [Strategy::BreadthFirst, Strategy::DepthFirst, Strategy::BestFirst] {
            assert!(SearchEngine::new(&problem, strategy).run().is_none());
        }
    }

    #[test]
    fn depth_cap_order_decides_goals_at_the_cap() {
        // The goal at column 4 is two moves away.
        let mut problem = LineProblem::new(4, 10);
        problem.cap = Some(2);
        let solution = SearchEngine::new(&problem, Strategy::BreadthFirst)
            .run()
            .unwrap();
        assert_eq!(solution.positions.len(), 3);

        problem.cap_first = true;
        let mut engine = SearchEngine::new(&problem, Strategy::BreadthFirst);
        assert!(engine.search().is_none());
        assert!(engine.stats().depth_capped > 0);
        assert!(engine.take_explored().iter().all(|path| path.len() <= 3));
    }
}
