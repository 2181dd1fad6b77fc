//! Immutable 2-D grid model shared by the routing and placement problems.
//!
//! Both grid flavors (0/1 occupancy for routing, `R`/`.`/`W` for placement)
//! are stored the same way: a row-major buffer of [`CellFlags`].

use crate::error::*;
use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const NONE = 0;
        const BLOCKED = 1;
        const TARGET = 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Open,
    Blocked,
    Target,
}

impl From<CellFlags> for CellKind {
    fn from(flags: CellFlags) -> Self {
        if flags.contains(CellFlags::BLOCKED) {
            CellKind::Blocked
        } else if flags.contains(CellFlags::TARGET) {
            CellKind::Target
        } else {
            CellKind::Open
        }
    }
}

impl From<CellKind> for CellFlags {
    fn from(kind: CellKind) -> Self {
        match kind {
            CellKind::Open => CellFlags::NONE,
            CellKind::Blocked => CellFlags::BLOCKED,
            CellKind::Target => CellFlags::TARGET,
        }
    }
}

impl CellKind {
    /// Placement-flavor symbol: `R` room, `.` open, `W` wall.
    pub fn from_symbol(symbol: char) -> Option<CellKind> {
        match symbol {
            'R' => Some(CellKind::Target),
            '.' => Some(CellKind::Open),
            'W' => Some(CellKind::Blocked),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    buffer: Vec<CellFlags>,
}

impl Grid {
    /// Build a grid from row-major cell kinds. `kinds.len()` must equal `rows * cols`.
    pub fn from_kinds(rows: usize, cols: usize, kinds: Vec<CellKind>) -> Result<Grid> {
        if rows == 0 || cols == 0 {
            return Err(PlannerError::EmptyGrid);
        }
        if rows > u16::MAX as usize + 1 || cols > u16::MAX as usize + 1 {
            return Err(PlannerError::Config(format!(
                "grid of {}x{} exceeds the addressable size",
                rows, cols
            )));
        }
        if kinds.len() != rows * cols {
            return Err(PlannerError::NonRectangular {
                row: kinds.len() / cols,
                expected: cols,
                found: kinds.len() % cols,
            });
        }
        Ok(Grid {
            rows,
            cols,
            buffer: kinds.into_iter().map(CellFlags::from).collect(),
        })
    }

    /// Routing flavor: `0` is free, `1` is an obstacle.
    pub fn from_occupancy<R: AsRef<[u8]>>(cells: &[R]) -> Result<Grid> {
        let cols = check_rectangular(cells.iter().map(|row| row.as_ref().len()))?;
        let mut kinds = Vec::with_capacity(cells.len() * cols);
        for (r, row) in cells.iter().enumerate() {
            for (c, &value) in row.as_ref().iter().enumerate() {
                let kind = match value {
                    0 => CellKind::Open,
                    1 => CellKind::Blocked,
                    other => {
                        return Err(PlannerError::UnknownSymbol {
                            symbol: other.to_string(),
                            row: r,
                            col: c,
                        })
                    }
                };
                kinds.push(kind);
            }
        }
        Grid::from_kinds(cells.len(), cols, kinds)
    }

    /// Placement flavor: one string per row using `R`, `.` and `W`.
    pub fn from_symbols<S: AsRef<str>>(cells: &[S]) -> Result<Grid> {
        let cols = check_rectangular(cells.iter().map(|row| row.as_ref().chars().count()))?;
        let mut kinds = Vec::with_capacity(cells.len() * cols);
        for (r, row) in cells.iter().enumerate() {
            for (c, symbol) in row.as_ref().chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or_else(|| {
                    PlannerError::UnknownSymbol {
                        symbol: symbol.to_string(),
                        row: r,
                        col: c,
                    }
                })?;
                kinds.push(kind);
            }
        }
        Grid::from_kinds(cells.len(), cols, kinds)
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        (pos.row() as usize) < self.rows && (pos.col() as usize) < self.cols
    }

    pub fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(PlannerError::OutOfBounds {
                row: pos.row() as i64,
                col: pos.col() as i64,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn cell_kind(&self, pos: Position) -> Result<CellKind> {
        self.check_bounds(pos)?;
        Ok(self.kind_at(pos))
    }

    /// Cell kind for a position the caller already knows is in bounds.
    #[inline]
    pub fn kind_at(&self, pos: Position) -> CellKind {
        CellKind::from(self.flags_at(pos))
    }

    #[inline]
    fn flags_at(&self, pos: Position) -> CellFlags {
        self.buffer[self.index(pos)]
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row() as usize * self.cols + pos.col() as usize
    }

    /// In bounds and not blocked.
    pub fn is_traversable(&self, pos: Position) -> bool {
        self.contains(pos) && !self.flags_at(pos).contains(CellFlags::BLOCKED)
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.contains(pos) && self.flags_at(pos).contains(CellFlags::BLOCKED)
    }

    pub fn is_target(&self, pos: Position) -> bool {
        self.contains(pos) && self.kind_at(pos) == CellKind::Target
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.contains(pos) && self.kind_at(pos) == CellKind::Open
    }

    /// All cells in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let cols = self.cols;
        (0..self.buffer.len()).map(move |i| Position::new((i / cols) as u16, (i % cols) as u16))
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |pos| self.is_open(*pos))
    }

    pub fn targets(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |pos| self.is_target(*pos))
    }

    /// Geometric center as `(rows / 2, cols / 2)`.
    pub fn center(&self) -> (f64, f64) {
        (self.rows as f64 / 2.0, self.cols as f64 / 2.0)
    }
}

impl FromStr for Grid {
    type Err = PlannerError;

    /// Parse newline-separated placement symbols. Blank lines and surrounding
    /// whitespace are ignored.
    fn from_str(s: &str) -> Result<Grid> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        Grid::from_symbols(&rows)
    }
}

fn check_rectangular(mut lengths: impl Iterator<Item = usize>) -> Result<usize> {
    let expected = match lengths.next() {
        Some(0) | None => return Err(PlannerError::EmptyGrid),
        Some(len) => len,
    };
    for (i, found) in lengths.enumerate() {
        if found != expected {
            return Err(PlannerError::NonRectangular {
                row: i + 1,
                expected,
                found,
            });
        }
    }
    Ok(expected)
}

/// A dense per-cell array sized to a grid.
#[derive(Clone, Debug)]
pub struct GridData<T: Copy> {
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy> GridData<T> {
    pub fn new(grid: &Grid, initial: T) -> Self {
        GridData {
            cols: grid.cols(),
            data: vec![initial; grid.cell_count()],
        }
    }

    #[inline]
    pub fn get(&self, pos: Position) -> &T {
        &self.data[pos.row() as usize * self.cols + pos.col() as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Position) -> &mut T {
        let index = pos.row() as usize * self.cols + pos.col() as usize;
        &mut self.data[index]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, value: T) {
        *self.get_mut(pos) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, &T)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (Position::new((i / cols) as u16, (i % cols) as u16), v))
    }
}
