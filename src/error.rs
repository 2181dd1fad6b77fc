//! Error types for grid construction, problem setup and configuration.
//!
//! Only precondition violations are errors. A search that runs out of
//! frontier, or stops at its depth or branching caps, returns `Ok(None)`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    NonRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell symbol {symbol:?} at ({row}, {col})")]
    UnknownSymbol { symbol: String, row: usize, col: usize },

    #[error("position ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },

    #[error("router range must be positive, got {0}")]
    InvalidRange(u32),

    #[error("branching cap must be positive, got {0}")]
    InvalidBranching(usize),

    #[error("depth bound must be positive, got {0}")]
    InvalidDepth(usize),

    #[error("action ({d_row}, {d_col}) does not move the agent")]
    InvalidAction { d_row: i32, d_col: i32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
