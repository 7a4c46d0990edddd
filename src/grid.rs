use std::fmt;

use thiserror::Error;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// A black square. Never part of a slot.
    Blocked,
    /// An open square waiting for a letter.
    Empty,
    /// An open square carrying a clue number.
    Number(u32),
    /// An open square with a pre-filled letter.
    Letter(char),
}

impl Cell {
    pub fn is_blocked(self) -> bool {
        matches!(self, Cell::Blocked)
    }

    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Letter(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid is not rectangular: row {row} has {found} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unrecognized cell {character:?} at row {row}, column {col}")]
    InvalidCell {
        character: char,
        row: usize,
        col: usize,
    },
    #[error("grid has no rows")]
    EmptyGrid,
}

/// A rectangular crossword grid.
///
/// The solver only reads a `Grid`; an editor owns mutation. A finished fill is
/// written back through [`Solution::apply`](crate::Solution::apply), which
/// touches `Empty` and `Number` cells only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Parses a text grid: `#` is a blocked cell, space or `.` an open cell,
    /// a letter a pre-filled cell (lowercase is uppercased), a digit a clue
    /// number. Empty lines are skipped, so multi-line literals can start with
    /// a newline.
    pub fn parse(input: &str) -> Result<Grid, GridError> {
        let lines: Vec<&str> = input.lines().filter(|line| !line.is_empty()).collect();
        if lines.is_empty() {
            return Err(GridError::EmptyGrid);
        }

        let width = lines[0].chars().count();
        let height = lines.len();
        let mut cells = Vec::with_capacity(width * height);

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridError::NotRectangular {
                    row,
                    found,
                    expected: width,
                });
            }
            for (col, character) in line.chars().enumerate() {
                let cell = match character {
                    '#' => Cell::Blocked,
                    ' ' | '.' => Cell::Empty,
                    'A'..='Z' => Cell::Letter(character),
                    'a'..='z' => Cell::Letter(character.to_ascii_uppercase()),
                    '0'..='9' => Cell::Number(character as u32 - '0' as u32),
                    _ => {
                        return Err(GridError::InvalidCell {
                            character,
                            row,
                            col,
                        })
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Grid {
            cells,
            width,
            height,
        })
    }

    /// Builds a grid from rows of cells, for callers that hold a structured
    /// snapshot rather than text.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Grid, GridError> {
        if rows.is_empty() {
            return Err(GridError::EmptyGrid);
        }
        let width = rows[0].len();
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != width {
                return Err(GridError::NotRectangular {
                    row,
                    found: cols.len(),
                    expected: width,
                });
            }
            cells.extend(cols);
        }
        Ok(Grid {
            cells,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.width + col] = cell;
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let c = match self.cell(row, col) {
                    Cell::Blocked => '#',
                    Cell::Empty => '.',
                    Cell::Letter(letter) => letter,
                    Cell::Number(n) => {
                        std::char::from_digit(n % 10, 10).unwrap_or('.')
                    }
                };
                write!(f, "{}", c)?;
                if col != self.width - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
