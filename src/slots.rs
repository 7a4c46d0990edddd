use std::fmt;

use log::debug;
use rustc_hash::FxHashMap;

use crate::grid::{Cell, Grid};

/// Index of a slot in creation (row-major) order. This is the identity the
/// engine works with; clue numbers are cosmetic.
pub type SlotId = usize;

/// Letters already sitting in the grid, keyed by cell.
pub type PreFilledMap = FxHashMap<Position, char>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Across,
    Down,
}

/// A maximal run of at least two open cells, read across or down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Crossword-style clue number: cells are numbered sequentially in
    /// row-major order whenever they start an across or a down slot, and a
    /// cell starting both shares one number.
    pub number: u32,
    pub direction: Direction,
    pub positions: Vec<Position>,
}

impl Slot {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            Direction::Across => "Across",
            Direction::Down => "Down",
        };
        write!(f, "{}-{}", self.number, direction)
    }
}

/// Scans the grid for slots and pre-filled letters.
///
/// A cell starts an across slot iff it is open, sits at the left border or
/// right of a blocked cell, and has an open cell to its right; down slots are
/// symmetric. Runs of length one are not slots, so a numbered cell with no
/// viable run in either direction yields nothing.
pub fn extract_slots(grid: &Grid) -> (Vec<Slot>, PreFilledMap) {
    let mut slots = Vec::new();
    let mut prefilled = PreFilledMap::default();
    let mut number = 0u32;

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let cell = grid.cell(row, col);
            if let Cell::Letter(letter) = cell {
                prefilled.insert(Position { row, col }, letter);
            }
            if cell.is_blocked() {
                continue;
            }

            let starts_across = (col == 0 || grid.cell(row, col - 1).is_blocked())
                && col + 1 < grid.width()
                && !grid.cell(row, col + 1).is_blocked();
            let starts_down = (row == 0 || grid.cell(row - 1, col).is_blocked())
                && row + 1 < grid.height()
                && !grid.cell(row + 1, col).is_blocked();

            if !starts_across && !starts_down {
                continue;
            }
            number += 1;

            if starts_across {
                let positions = (col..grid.width())
                    .take_while(|&c| !grid.cell(row, c).is_blocked())
                    .map(|c| Position { row, col: c })
                    .collect();
                slots.push(Slot {
                    number,
                    direction: Direction::Across,
                    positions,
                });
            }
            if starts_down {
                let positions = (row..grid.height())
                    .take_while(|&r| !grid.cell(r, col).is_blocked())
                    .map(|r| Position { row: r, col })
                    .collect();
                slots.push(Slot {
                    number,
                    direction: Direction::Down,
                    positions,
                });
            }
        }
    }

    debug!(
        "extracted {} slots, {} pre-filled letters",
        slots.len(),
        prefilled.len()
    );
    (slots, prefilled)
}
