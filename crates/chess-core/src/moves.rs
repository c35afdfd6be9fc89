//! Move value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::piece::PieceType;
use crate::position::Position;

/// A move from one square to another.
///
/// `promotion` is `Some` only when a pawn move ends on the opponent's
/// back rank; the legal-move set then contains one entry per promotion
/// choice, and `Game::make_move` matches on the whole value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub start: Position,
    pub end: Position,
    pub promotion: Option<PieceType>,
}

impl Move {
    pub fn new(start: Position, end: Position) -> Self {
        Move {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Position, end: Position, promotion: PieceType) -> Self {
        Move {
            start,
            end,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for Move {
    /// Coordinate form, e.g. `e2e4` or `a7a8=Q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            let c = match kind {
                PieceType::Queen => 'Q',
                PieceType::Rook => 'R',
                PieceType::Bishop => 'B',
                PieceType::Knight => 'N',
                PieceType::King => 'K',
                PieceType::Pawn => 'P',
            };
            write!(f, "={}", c)?;
        }
        Ok(())
    }
}
