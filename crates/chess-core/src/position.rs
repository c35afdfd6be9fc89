//! Board coordinates and side colors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two sides in a chess game.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The opposing side.
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Pawn movement direction: +1 row for White, -1 for Black.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank this side's pawns start on.
    pub fn pawn_start_rank(self) -> u8 {
        match self {
            Color::White => 2,
            Color::Black => 7,
        }
    }

    /// The opponent's back rank, where this side's pawns promote.
    pub fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 8,
            Color::Black => 1,
        }
    }

    /// The rank this side's king and rooks start on.
    pub fn back_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 8,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "WHITE"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

/// A square on the board. Rank (`row`) and file (`col`) are both 1-based
/// and in `[1, 8]`; callers pre-filter bounds, the type does not validate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Position { row, col }
    }

    /// Apply a (row, col) delta, returning `None` when the result falls
    /// off the board. All move generation goes through this, which is
    /// what keeps the rest of the crate free of bounds checks.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Position> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (1..=8).contains(&row) && (1..=8).contains(&col) {
            Some(Position::new(row as u8, col as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    /// Algebraic form, e.g. `e4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col - 1) as char;
        write!(f, "{}{}", file, self.row)
    }
}
