use serde::*;
use std::fmt;

/// A grid cell coordinate, packed as `row << 16 | col`.
///
/// The derived ordering on the packed value is row-major, which is the
/// order used for sorted placement fingerprints.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Position {
    packed: u32,
}

impl Position {
    pub fn new(row: u16, col: u16) -> Self {
        Position {
            packed: ((row as u32) << 16) | (col as u32),
        }
    }

    #[inline]
    pub fn row(self) -> u16 {
        ((self.packed >> 16) & 0xFFFF) as u16
    }

    #[inline]
    pub fn col(self) -> u16 {
        (self.packed & 0xFFFF) as u16
    }

    #[inline]
    pub fn packed_repr(self) -> u32 {
        self.packed
    }

    #[inline]
    pub fn from_packed(packed: u32) -> Self {
        Position { packed }
    }

    /// Apply a `(d_row, d_col)` offset. Returns `None` if either coordinate
    /// leaves the representable range; grid bounds are checked by the grid.
    pub fn offset(self, d_row: i32, d_col: i32) -> Option<Position> {
        let row = self.row() as i64 + d_row as i64;
        let col = self.col() as i64 + d_col as i64;
        if (0..=u16::MAX as i64).contains(&row) && (0..=u16::MAX as i64).contains(&col) {
            Some(Position::new(row as u16, col as u16))
        } else {
            None
        }
    }

    /// Signed `(d_row, d_col)` from `self` to `other`.
    pub fn delta_to(self, other: Self) -> (i32, i32) {
        (
            other.row() as i32 - self.row() as i32,
            other.col() as i32 - self.col() as i32,
        )
    }

    /// Squared Euclidean distance, exact in integers.
    pub fn distance_sq_to(self, other: Self) -> u64 {
        let (dr, dc) = self.delta_to(other);
        (dr as i64 * dr as i64 + dc as i64 * dc as i64) as u64
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (self.distance_sq_to(other) as f64).sqrt()
    }

    pub fn manhattan_to(self, other: Self) -> u32 {
        let (dr, dc) = self.delta_to(other);
        dr.unsigned_abs() + dc.unsigned_abs()
    }
}

impl From<(u16, u16)> for Position {
    fn from((row, col): (u16, u16)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.packed_repr().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Position::from_packed)
    }
}
