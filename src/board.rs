//! One side's private 10×10 grid and its cell-transition rules.

use crate::bitboard::BitBoard;
use crate::common::{BoardError, Cell, Coord, Outcome};
use crate::config::BOARD_SIZE;
use core::fmt;
use rand::Rng;

type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

/// Read-only copy of every cell, indexed `[x][y]`. Only ever handed to the
/// display side; the peer never sees it.
pub type BoardSnapshot = [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize];

/// Ship placements plus the cells that have been attacked.
///
/// `ships` keeps every cell that was ever a ship, so `hits` is always a
/// subset of it and `misses` is always disjoint from it.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    ships: BB,
    hits: BB,
    misses: BB,
}

impl Board {
    /// All-water board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh board with `ship_count` ships at random distinct cells.
    pub fn seeded<R: Rng>(rng: &mut R, ship_count: usize) -> Result<Self, BoardError> {
        let mut board = Self::new();
        board.seed(rng, ship_count)?;
        Ok(board)
    }

    /// Resets every cell to water, then drops ships on uniformly random
    /// water cells until exactly `ship_count` are placed.
    pub fn seed<R: Rng>(&mut self, rng: &mut R, ship_count: usize) -> Result<(), BoardError> {
        let capacity = BOARD_SIZE as usize * BOARD_SIZE as usize;
        if ship_count > capacity {
            return Err(BoardError::TooManyShips {
                requested: ship_count,
                capacity,
            });
        }
        *self = Self::new();
        let mut remaining = ship_count;
        while remaining > 0 {
            let coord = Coord::new(
                rng.random_range(0..BOARD_SIZE as usize),
                rng.random_range(0..BOARD_SIZE as usize),
            )?;
            if !self.ships.get(coord)? {
                self.ships.set(coord)?;
                remaining -= 1;
            }
        }
        Ok(())
    }

    /// Put a ship on a water cell.
    pub fn place_ship(&mut self, coord: Coord) -> Result<(), BoardError> {
        if self.cell(coord) != Cell::Water {
            return Err(BoardError::CellOccupied(coord));
        }
        self.ships.set(coord)?;
        Ok(())
    }

    /// Current state of one cell.
    pub fn cell(&self, coord: Coord) -> Cell {
        let at = |bb: &BB| bb.get(coord).unwrap_or(false);
        if at(&self.hits) {
            Cell::Hit
        } else if at(&self.misses) {
            Cell::Miss
        } else if at(&self.ships) {
            Cell::Ship
        } else {
            Cell::Water
        }
    }

    /// Whether `coord` has already been attacked.
    pub fn is_resolved(&self, coord: Coord) -> bool {
        self.cell(coord).is_resolved()
    }

    /// Apply an attack against this board.
    ///
    /// `Ship` becomes `Hit`, `Water` becomes `Miss`. Already resolved cells
    /// keep their state and report it again.
    pub fn apply_attack(&mut self, coord: Coord) -> Result<Outcome, BoardError> {
        match self.cell(coord) {
            Cell::Ship => {
                self.hits.set(coord)?;
                Ok(Outcome::Hit)
            }
            Cell::Hit => Ok(Outcome::Hit),
            Cell::Water => {
                self.misses.set(coord)?;
                Ok(Outcome::Miss)
            }
            Cell::Miss => Ok(Outcome::Miss),
        }
    }

    /// True once any ship cell on this board has been hit.
    pub fn has_any_sunk_ship(&self) -> bool {
        !self.hits.is_empty()
    }

    /// Ships not yet hit.
    pub fn ship_count(&self) -> usize {
        (self.ships & !self.hits).count_ones()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.count_ones()
    }

    /// Number of cells attacked so far, hits and misses together.
    pub fn attacks_taken(&self) -> usize {
        (self.hits | self.misses).count_ones()
    }

    /// Coordinates of every cell that holds or held a ship.
    pub fn ship_positions(&self) -> impl Iterator<Item = Coord> + '_ {
        self.ships.iter_set()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut grid = [[Cell::Water; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for coord in Coord::all() {
            grid[coord.x()][coord.y()] = self.cell(coord);
        }
        grid
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ships:\n{:?}  hits:\n{:?}  misses:\n{:?}}}",
            self.ships, self.hits, self.misses
        )
    }
}

/// Opponent grid as seen by the attacker: which of our shots hit or missed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ShotBoard {
    hits: BB,
    misses: BB,
}

impl ShotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reported outcome of one of our attacks.
    pub fn record(&mut self, coord: Coord, outcome: Outcome) -> Result<(), BoardError> {
        match outcome {
            Outcome::Hit => self.hits.set(coord)?,
            Outcome::Miss => self.misses.set(coord)?,
        }
        Ok(())
    }

    /// Whether we already fired at `coord`.
    pub fn already_targeted(&self, coord: Coord) -> bool {
        (self.hits | self.misses).get(coord).unwrap_or(false)
    }

    /// What we know about one opponent cell; unknown cells read as `Water`.
    pub fn cell(&self, coord: Coord) -> Cell {
        if self.hits.get(coord).unwrap_or(false) {
            Cell::Hit
        } else if self.misses.get(coord).unwrap_or(false) {
            Cell::Miss
        } else {
            Cell::Water
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut grid = [[Cell::Water; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for coord in Coord::all() {
            grid[coord.x()][coord.y()] = self.cell(coord);
        }
        grid
    }
}
