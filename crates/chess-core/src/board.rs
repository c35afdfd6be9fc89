//! 8x8 board storage.
//!
//! The board is pure storage: a fixed grid mapping square -> occupying
//! piece. It knows nothing about rules; `place` is an unconditional
//! overwrite and `get` a plain lookup. All rules live in `movegen` and
//! `game`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::{Piece, PieceType};
use crate::position::{Color, Position};

/// Fixed 8x8 grid of optional pieces.
///
/// Structural equality is derived so tests can compare whole positions
/// directly. Cloning is a flat copy of 64 small values, which is what
/// makes snapshot-based self-check simulation cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board::default()
    }

    /// A board set up in the standard starting position.
    pub fn initial() -> Self {
        let mut board = Board::new();

        let back_rank = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        for (i, kind) in back_rank.into_iter().enumerate() {
            let col = i as u8 + 1;
            board.place(Position::new(1, col), Some(Piece::new(Color::White, kind)));
            board.place(Position::new(8, col), Some(Piece::new(Color::Black, kind)));
            board.place(
                Position::new(2, col),
                Some(Piece::new(Color::White, PieceType::Pawn)),
            );
            board.place(
                Position::new(7, col),
                Some(Piece::new(Color::Black, PieceType::Pawn)),
            );
        }

        board
    }

    /// Put `piece` (or empty) on `pos`, overwriting whatever was there.
    pub fn place(&mut self, pos: Position, piece: Option<Piece>) {
        self.squares[pos.row as usize - 1][pos.col as usize - 1] = piece;
    }

    /// The piece at `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row as usize - 1][pos.col as usize - 1]
    }

    /// Iterate over every occupied square.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        (1..=8u8).flat_map(move |row| {
            (1..=8u8).filter_map(move |col| {
                let pos = Position::new(row, col);
                self.get(pos).map(|piece| (pos, piece))
            })
        })
    }
}

impl fmt::Display for Board {
    /// ASCII diagram, rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=8u8).rev() {
            write!(f, "{} ", row)?;
            for col in 1..=8u8 {
                match self.get(Position::new(row, col)) {
                    Some(piece) => write!(f, "{} ", piece.as_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}
