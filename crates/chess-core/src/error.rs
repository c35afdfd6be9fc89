//! Error types for the rules core.
//!
//! The only fallible normal-path operation is `Game::make_move`; a
//! missing king is deliberately *not* an error value, it panics (see
//! `Game::is_in_check`).

use thiserror::Error;

use crate::moves::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The move fails the legality check, or the piece does not belong
    /// to the side whose turn it is. The game state is unchanged.
    #[error("illegal move: {0}")]
    IllegalMove(Move),
}
