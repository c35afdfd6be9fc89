//! Command rejection taxonomy.
//!
//! Every variant is handled locally by the coordinator and converted
//! into an `ERROR` frame to the originating connection only; none of
//! them terminate the transport except `Unauthorized`/`NotFound` during
//! `CONNECT` (the client task enforces that part).

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad, missing, or unknown auth token.
    #[error("Error: unauthorized")]
    Unauthorized,

    /// Unknown game id.
    #[error("Error: game does not exist")]
    NotFound,

    /// The move fails the legality check.
    #[error("Error: illegal move")]
    IllegalMove,

    /// The sender's seat color does not match the side to move.
    #[error("Error: not your turn")]
    WrongTurn,

    /// The game is already finished.
    #[error("Error: game already over")]
    GameOver,

    /// Move/resign attempted by a connection holding neither seat.
    #[error("Error: you are not part of this game")]
    NotParticipant,

    /// Registering the connection violated a registry invariant.
    #[error("Error: connection already registered")]
    SessionConflict,

    /// Unparseable or unrecognized command frame.
    #[error("Error: badly formatted command")]
    BadCommand,

    /// External store failure; surfaces to the invoking command only,
    /// never retried in the background.
    #[error("Error: {0}")]
    Store(#[from] StoreError),
}
