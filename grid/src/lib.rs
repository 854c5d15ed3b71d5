#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable obstacle grid consumed by the search system.
//!
//! A [`Grid`] is built once from its dimensions and a list of [`BlockRect`]
//! obstacles and never changes afterwards, so a single instance can be shared
//! by any number of concurrent searches without locking.

use std::{fmt, iter};

use gridstar_core::{BlockRect, CellCoord};
use thiserror::Error;

/// Dense row-major obstacle mask with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    blocked: Vec<bool>,
    blocked_count: usize,
}

impl Grid {
    /// Builds a grid and marks every cell of every block as impassable.
    ///
    /// Overlapping blocks are allowed. Blocks must lie entirely inside the grid
    /// and must not be inverted; violations are reported instead of being
    /// clipped so that malformed maps surface early.
    pub fn new<I>(width: u32, height: u32, blocks: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = BlockRect>,
    {
        let cell_count = cell_count(width, height)?;
        let mut grid = Self {
            width,
            height,
            blocked: vec![false; cell_count],
            blocked_count: 0,
        };

        for block in blocks {
            if block.is_inverted() {
                return Err(GridError::InvertedBlock {
                    min: block.min(),
                    max: block.max(),
                });
            }

            if !grid.contains(block.max()) {
                return Err(GridError::BlockOutOfBounds {
                    min: block.min(),
                    max: block.max(),
                    width,
                    height,
                });
            }

            for cell in block.cells() {
                let index = grid.index(cell);
                if !grid.blocked[index] {
                    grid.blocked[index] = true;
                    grid.blocked_count += 1;
                }
            }
        }

        Ok(grid)
    }

    /// Builds a grid without any obstacles.
    pub fn open(width: u32, height: u32) -> Result<Self, GridError> {
        Self::new(width, height, iter::empty())
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.blocked.len()
    }

    /// Number of distinct impassable cells.
    #[must_use]
    pub const fn blocked_count(&self) -> usize {
        self.blocked_count
    }

    /// Row-major index of the provided cell.
    ///
    /// The result is only meaningful for cells inside the grid; callers check
    /// bounds with [`Grid::contains`] first.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> usize {
        cell.row() as usize * self.width as usize + cell.column() as usize
    }

    /// Cell addressed by the provided row-major index.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> CellCoord {
        let width = self.width as usize;
        CellCoord::new((index % width) as u32, (index / width) as u32)
    }

    /// Returns `true` when the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Returns `true` when the cell at `index` is impassable.
    #[must_use]
    pub fn is_blocked(&self, index: usize) -> bool {
        self.blocked.get(index).copied().unwrap_or(false)
    }

    /// Returns `true` when the provided in-bounds cell is impassable.
    #[must_use]
    pub fn is_cell_blocked(&self, cell: CellCoord) -> bool {
        self.is_blocked(self.index(cell))
    }

    /// Checks that a search endpoint lies inside the grid on an open cell.
    pub fn validate_endpoint(&self, cell: CellCoord, endpoint: Endpoint) -> Result<(), GridError> {
        if !self.contains(cell) {
            return Err(GridError::EndpointOutOfBounds {
                endpoint,
                cell,
                width: self.width,
                height: self.height,
            });
        }

        if self.is_cell_blocked(cell) {
            return Err(GridError::EndpointBlocked { endpoint, cell });
        }

        Ok(())
    }
}

fn cell_count(width: u32, height: u32) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::EmptyDimensions { width, height });
    }

    let width_usize = usize::try_from(width).map_err(|_| GridError::TooLarge { width, height })?;
    let height_usize =
        usize::try_from(height).map_err(|_| GridError::TooLarge { width, height })?;
    width_usize
        .checked_mul(height_usize)
        .ok_or(GridError::TooLarge { width, height })
}

/// Role a cell plays in a search request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Cell the search starts from.
    Start,
    /// Cell the search tries to reach.
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Goal => write!(f, "goal"),
        }
    }
}

/// Errors raised while building a grid or validating search endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height was zero.
    #[error("grid dimensions must be positive (received {width}x{height})")]
    EmptyDimensions {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },
    /// Cell count does not fit into memory addressing.
    #[error("grid of {width}x{height} cells is too large")]
    TooLarge {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },
    /// Block end corner lies before its start corner.
    #[error("block {min}..{max} has its end corner before its start corner")]
    InvertedBlock {
        /// First corner supplied for the block.
        min: CellCoord,
        /// Second corner supplied for the block.
        max: CellCoord,
    },
    /// Block reaches past the grid edge.
    #[error("block {min}..{max} extends outside the {width}x{height} grid")]
    BlockOutOfBounds {
        /// First corner supplied for the block.
        min: CellCoord,
        /// Second corner supplied for the block.
        max: CellCoord,
        /// Grid column count.
        width: u32,
        /// Grid row count.
        height: u32,
    },
    /// Search endpoint lies outside the grid.
    #[error("{endpoint} position {cell} lies outside the {width}x{height} grid")]
    EndpointOutOfBounds {
        /// Role of the rejected cell.
        endpoint: Endpoint,
        /// Rejected cell.
        cell: CellCoord,
        /// Grid column count.
        width: u32,
        /// Grid row count.
        height: u32,
    },
    /// Search endpoint sits on an impassable cell.
    #[error("{endpoint} position {cell} is blocked")]
    EndpointBlocked {
        /// Role of the rejected cell.
        endpoint: Endpoint,
        /// Rejected cell.
        cell: CellCoord,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_cell_at() {
        let grid = Grid::open(5, 3).expect("valid grid");
        let cell = CellCoord::new(3, 2);

        assert_eq!(grid.index(cell), 13);
        assert_eq!(grid.cell_at(13), cell);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(
            Grid::open(0, 4),
            Err(GridError::EmptyDimensions {
                width: 0,
                height: 4
            })
        );
        assert_eq!(
            Grid::open(4, 0),
            Err(GridError::EmptyDimensions {
                width: 4,
                height: 0
            })
        );
    }

    #[test]
    fn is_blocked_treats_unknown_indices_as_open() {
        let grid = Grid::new(2, 2, [BlockRect::new(0, 0, 1, 1)]).expect("valid grid");

        assert!(grid.is_blocked(3));
        assert!(!grid.is_blocked(4));
    }
}
