//! Server -> client messages.

use serde::{Deserialize, Serialize};

use chess_core::GameSession;

/// A message pushed by the server to a connected client.
///
/// Wire form is a tagged JSON object, e.g.:
/// `{"message_type":"NOTIFICATION","message":"alice has joined the game"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Full current game state. Sent to a connection on join and
    /// broadcast to everyone after each accepted move.
    LoadGame { game: GameSession },

    /// Human-readable event text (joins, moves, check, resignation).
    Notification { message: String },

    /// Human-readable rejection, sent to the originating connection only.
    Error { error_message: String },
}

impl ServerMessage {
    pub fn load_game(game: GameSession) -> Self {
        ServerMessage::LoadGame { game }
    }

    pub fn notification(message: impl Into<String>) -> Self {
        ServerMessage::Notification {
            message: message.into(),
        }
    }

    pub fn error(error_message: impl Into<String>) -> Self {
        ServerMessage::Error {
            error_message: error_message.into(),
        }
    }
}
