use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Filled(Player),
}

/// Classification of a board: still being played, won, or drawn.
/// Computed fresh from the cells on every query, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStatus {
    InProgress,
    Won(Player),
    Draw,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("coordinates ({row}, {col}) are out of bounds, rows and columns go 0-2")]
    InvalidCoordinate { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    OccupiedCell { row: usize, col: usize },
}

/// A 3x3 grid of cells, row-major. Mutation happens through `place`
/// (validated) and `clear` (unchecked undo of a caller's own mark).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; 3]; 3],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; 3]; 3],
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    /// Puts `side`'s mark at (row, col). Rejects out-of-range coordinates
    /// and occupied cells without touching the board.
    pub fn place(&mut self, row: usize, col: usize, side: Player) -> Result<(), BoardError> {
        if row > 2 || col > 2 {
            return Err(BoardError::InvalidCoordinate { row, col });
        }
        match self.cells[row][col] {
            Cell::Empty => {
                self.cells[row][col] = Cell::Filled(side);
                Ok(())
            }
            Cell::Filled(_) => Err(BoardError::OccupiedCell { row, col }),
        }
    }

    /// Unconditionally empties (row, col). Only for undoing a mark the
    /// caller placed itself; there is no validation.
    pub fn clear(&mut self, row: usize, col: usize) {
        self.cells[row][col] = Cell::Empty;
    }

    /// Empty cells in row-major ascending order. The order is load-bearing:
    /// it is the tie-break order for equally scored moves.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..3 {
            for col in 0..3 {
                if self.cells[row][col] == Cell::Empty {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    pub fn terminal_status(&self) -> TerminalStatus {
        // Check rows
        for row in 0..3 {
            if let Cell::Filled(side) = self.cells[row][0] {
                if self.cells[row][1] == Cell::Filled(side) && self.cells[row][2] == Cell::Filled(side) {
                    return TerminalStatus::Won(side);
                }
            }
        }

        // Check columns
        for col in 0..3 {
            if let Cell::Filled(side) = self.cells[0][col] {
                if self.cells[1][col] == Cell::Filled(side) && self.cells[2][col] == Cell::Filled(side) {
                    return TerminalStatus::Won(side);
                }
            }
        }

        // Check diagonals
        if let Cell::Filled(side) = self.cells[1][1] {
            if self.cells[0][0] == Cell::Filled(side) && self.cells[2][2] == Cell::Filled(side) {
                return TerminalStatus::Won(side);
            }
            if self.cells[0][2] == Cell::Filled(side) && self.cells[2][0] == Cell::Filled(side) {
                return TerminalStatus::Won(side);
            }
        }

        if self.empty_cells().is_empty() {
            TerminalStatus::Draw
        } else {
            TerminalStatus::InProgress
        }
    }

    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; 3]; 3];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "     0   1   2")?;
        writeln!(f, "   ┌───┬───┬───┐")?;
        for row in 0..3 {
            write!(f, " {} │", row)?;
            for col in 0..3 {
                let symbol = match self.cell(row, col) {
                    Cell::Empty => ' ',
                    Cell::Filled(side) => side.symbol(),
                };
                write!(f, " {} │", symbol)?;
            }
            writeln!(f)?;
            if row < 2 {
                writeln!(f, "   ├───┼───┼───┤")?;
            }
        }
        write!(f, "   └───┴───┴───┘")
    }
}

// Builds a board from 'X', 'O' and '.' characters, row-major. Test helper.
#[cfg(test)]
pub(crate) fn board_from(layout: [[char; 3]; 3]) -> Board {
    let mut board = Board::new();
    for row in 0..3 {
        for col in 0..3 {
            match layout[row][col] {
                'X' => board.place(row, col, Player::X).unwrap(),
                'O' => board.place(row, col, Player::O).unwrap(),
                _ => {}
            }
        }
    }
    board
}
