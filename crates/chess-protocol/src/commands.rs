//! Client -> server commands.

use serde::{Deserialize, Serialize};

use chess_core::{GameId, Move};

/// A command sent by a client over its persistent connection.
///
/// Every variant carries the auth token and the game id it targets;
/// the coordinator re-resolves both on every command rather than
/// trusting connection-local state.
///
/// Wire form is a tagged JSON object, e.g.:
/// `{"command_type":"CONNECT","auth_token":"...","game_id":7}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientCommand {
    Connect {
        auth_token: String,
        game_id: GameId,
    },
    MakeMove {
        auth_token: String,
        game_id: GameId,
        #[serde(rename = "move")]
        mv: Move,
    },
    Leave {
        auth_token: String,
        game_id: GameId,
    },
    Resign {
        auth_token: String,
        game_id: GameId,
    },
}

impl ClientCommand {
    pub fn auth_token(&self) -> &str {
        match self {
            ClientCommand::Connect { auth_token, .. }
            | ClientCommand::MakeMove { auth_token, .. }
            | ClientCommand::Leave { auth_token, .. }
            | ClientCommand::Resign { auth_token, .. } => auth_token,
        }
    }

    pub fn game_id(&self) -> GameId {
        match self {
            ClientCommand::Connect { game_id, .. }
            | ClientCommand::MakeMove { game_id, .. }
            | ClientCommand::Leave { game_id, .. }
            | ClientCommand::Resign { game_id, .. } => *game_id,
        }
    }
}
