//! chess-protocol
//!
//! Wire-level envelope for the chess server.
//!
//! Both directions use newline-delimited JSON frames over a persistent
//! connection:
//! - [`commands`] : client -> server (`CONNECT`, `MAKE_MOVE`, `LEAVE`, `RESIGN`)
//! - [`messages`] : server -> client (`LOAD_GAME`, `NOTIFICATION`, `ERROR`)
//! - [`json_codec`] : frame encode/decode helpers

pub mod commands;
pub mod messages;
pub mod json_codec;

pub use commands::ClientCommand;
pub use json_codec::{decode_command, decode_message, encode_command, encode_message, ProtocolError};
pub use messages::ServerMessage;
