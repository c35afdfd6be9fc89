//! chess-core
//!
//! Pure chess rules logic:
//! - positions, pieces, moves (value types)
//! - 8x8 board storage
//! - pseudo-legal move generation per piece type
//! - full game state (turn, castling rights, en passant, terminal fields)
//! - game/session model shared with the server

pub mod position;
pub mod piece;
pub mod moves;
pub mod board;
pub mod movegen;
pub mod game;
pub mod model;
pub mod error;

pub use position::{Color, Position};
pub use piece::{Piece, PieceType};
pub use moves::Move;
pub use board::Board;
pub use movegen::pseudo_legal_moves;
pub use game::{CastlingRights, Game};
pub use model::{GameId, GameSession};
pub use error::MoveError;
