//! Shared game/session model.
//!
//! `GameSession` is the record the server persists and ships inside
//! `LOAD_GAME` frames: a game id, the two (optionally vacant) seats, a
//! display name and the embedded `Game`. Seat assignment itself happens
//! in the create/join facade, which is outside this workspace; the
//! coordinator only reads seats and clears them on leave.

use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::position::Color;

/// Identifier for a game.
///
/// Intentionally opaque; allocation is the game-creation facade's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub u32);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A game plus its seating, as stored and broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub game_id: GameId,
    pub white_username: Option<String>,
    pub black_username: Option<String>,
    pub game_name: String,
    pub game: Game,
}

impl GameSession {
    /// A fresh session with both seats vacant.
    pub fn new(game_id: GameId, game_name: impl Into<String>) -> Self {
        GameSession {
            game_id,
            white_username: None,
            black_username: None,
            game_name: game_name.into(),
            game: Game::new(),
        }
    }

    /// The username occupying `color`'s seat, if any.
    pub fn username_for(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white_username.as_deref(),
            Color::Black => self.black_username.as_deref(),
        }
    }

    /// Which seat `username` occupies, if any; `None` means spectator.
    pub fn seat_of(&self, username: &str) -> Option<Color> {
        if self.white_username.as_deref() == Some(username) {
            Some(Color::White)
        } else if self.black_username.as_deref() == Some(username) {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Vacate `color`'s seat.
    pub fn clear_seat(&mut self, color: Color) {
        match color {
            Color::White => self.white_username = None,
            Color::Black => self.black_username = None,
        }
    }
}
