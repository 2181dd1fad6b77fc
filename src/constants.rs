/// Action offsets `(d_row, d_col)` for 4-directional movement:
/// right, down, left, up.
pub const NEIGHBORS_4: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Default multiplier applied to heuristic estimates in best-first search.
pub const DEFAULT_H_FACTOR: f64 = 1.0;

/// Default bound on the number of facilities a placement search considers.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Default facility range.
pub const DEFAULT_ROUTER_RANGE: u32 = 1;

/// Inclusive bounds of the random placement score.
pub const RANDOM_SCORE_MIN: u32 = 1;
pub const RANDOM_SCORE_MAX: u32 = 10;

/// Penalty the column-traffic route estimate assigns to even columns.
pub const DEFAULT_TRAFFIC_PENALTY: f64 = 6.0;
