#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridstar path finder.
//!
//! This crate defines the value types that connect the adapters, the
//! immutable [`CellCoord`]-addressed grid, and the search system. Map loaders
//! describe obstacles as [`BlockRect`] values, the grid crate turns them into
//! an obstacle mask, and the search system prices every move with
//! [`StepKind::cost`] while estimating the remaining distance with
//! [`heuristic`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cost of a horizontal or vertical step between neighbouring cells.
pub const STRAIGHT_COST: u32 = 10;

/// Cost of a diagonal step between neighbouring cells, approximating `10 * sqrt(2)`.
pub const DIAGONAL_COST: u32 = 14;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.column, self.row)
    }
}

/// Estimated remaining cost from `cell` to `goal`.
///
/// The estimate is the Manhattan distance scaled by [`STRAIGHT_COST`]. It
/// overestimates diagonal-heavy routes under eight-way movement, so searches
/// guided by it favour reaching the goal quickly over strict optimality.
#[must_use]
pub fn heuristic(cell: CellCoord, goal: CellCoord) -> u32 {
    cell.manhattan_distance(goal) * STRAIGHT_COST
}

/// Kind of move taken between two neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Horizontal or vertical move.
    Straight,
    /// Move to one of the four corner-adjacent cells.
    Diagonal,
}

impl StepKind {
    /// Cost charged for taking a step of this kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Straight => STRAIGHT_COST,
            Self::Diagonal => DIAGONAL_COST,
        }
    }

    /// Classifies the move between two cells, returning `None` unless they are
    /// distinct eight-way neighbours.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());

        match (column_diff, row_diff) {
            (1, 0) | (0, 1) => Some(Self::Straight),
            (1, 1) => Some(Self::Diagonal),
            _ => None,
        }
    }
}

/// Axis-aligned block of impassable cells with inclusive bounds.
///
/// Serialised as the four-element array `[x0, y0, x1, y1]` used by map files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BlockRect {
    min: CellCoord,
    max: CellCoord,
}

impl BlockRect {
    /// Creates a block spanning `(x0, y0)` through `(x1, y1)` inclusive.
    #[must_use]
    pub const fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            min: CellCoord::new(x0, y0),
            max: CellCoord::new(x1, y1),
        }
    }

    /// Creates a block covering exactly one cell.
    #[must_use]
    pub const fn single(cell: CellCoord) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// First corner of the block.
    #[must_use]
    pub const fn min(&self) -> CellCoord {
        self.min
    }

    /// Opposite, inclusive corner of the block.
    #[must_use]
    pub const fn max(&self) -> CellCoord {
        self.max
    }

    /// Returns `true` when the end corner lies before the start corner on either axis.
    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        self.min.column > self.max.column || self.min.row > self.max.row
    }

    /// Returns `true` when the provided cell lies inside the block.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column >= self.min.column
            && cell.column <= self.max.column
            && cell.row >= self.min.row
            && cell.row <= self.max.row
    }

    /// Iterates every cell covered by the block, column by column.
    ///
    /// Inverted blocks yield nothing.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let rows = self.min.row..=self.max.row;
        (self.min.column..=self.max.column)
            .flat_map(move |column| rows.clone().map(move |row| CellCoord::new(column, row)))
    }
}

impl From<[u32; 4]> for BlockRect {
    fn from([x0, y0, x1, y1]: [u32; 4]) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl From<BlockRect> for [u32; 4] {
    fn from(block: BlockRect) -> Self {
        [
            block.min.column,
            block.min.row,
            block.max.column,
            block.max.row,
        ]
    }
}
