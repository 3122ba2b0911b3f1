//! Common types: coordinates, cell states, attack outcomes and board errors.

use crate::bitboard::BitBoardError;
use crate::config::BOARD_SIZE;

/// A validated grid position, `x` and `y` both in `0..BOARD_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Result<Self, BoardError> {
        if x >= BOARD_SIZE as usize || y >= BOARD_SIZE as usize {
            return Err(BoardError::InvalidCoordinate { x, y });
        }
        Ok(Coord {
            x: x as u8,
            y: y as u8,
        })
    }

    pub fn x(&self) -> usize {
        self.x as usize
    }

    pub fn y(&self) -> usize {
        self.y as usize
    }

    /// All coordinates of the grid in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|x| (0..BOARD_SIZE).map(move |y| Coord { x, y }))
    }
}

/// Wire form: `"<x>,<y>"`.
impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Water,
    Ship,
    /// A ship cell that took an attack. Terminal.
    Hit,
    /// A water cell that took an attack. Terminal.
    Miss,
}

impl Cell {
    /// `Hit` and `Miss` never change again.
    pub fn is_resolved(self) -> bool {
        matches!(self, Cell::Hit | Cell::Miss)
    }
}

/// Result of an attack against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Hit,
    Miss,
}

/// How a finished session ended for the local side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum GameResult {
    Won,
    Lost,
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error.
    BitBoardError(BitBoardError),
    /// Coordinate outside the 10×10 grid.
    InvalidCoordinate { x: usize, y: usize },
    /// Tried to place a ship on a cell that already holds one.
    CellOccupied(Coord),
    /// Requested more ships than the grid has cells.
    TooManyShips { requested: usize, capacity: usize },
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { x, y } => BoardError::InvalidCoordinate { x, y },
            other => BoardError::BitBoardError(other),
        }
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::InvalidCoordinate { x, y } => {
                write!(f, "Coordinate ({}, {}) is outside the board", x, y)
            }
            BoardError::CellOccupied(c) => write!(f, "Cell {} already holds a ship", c),
            BoardError::TooManyShips {
                requested,
                capacity,
            } => write!(
                f,
                "Cannot place {} ships on a board with {} cells",
                requested, capacity
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
