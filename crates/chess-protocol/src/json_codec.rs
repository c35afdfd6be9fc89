//! JSON frame codec.
//!
//! One frame per line; encoders return the JSON text without the
//! trailing newline (the transport layer owns framing). Decoders accept
//! a single line with surrounding whitespace.

use thiserror::Error;

use crate::commands::ClientCommand;
use crate::messages::ServerMessage;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Blank line where a frame was expected.
    #[error("empty frame")]
    EmptyFrame,

    /// Not valid JSON, or an unrecognized command/message discriminant.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode one client command frame.
pub fn decode_command(line: &str) -> Result<ClientCommand, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encode one client command frame.
pub fn encode_command(cmd: &ClientCommand) -> String {
    // Our types serialize infallibly (no non-string map keys).
    serde_json::to_string(cmd).unwrap_or_default()
}

/// Decode one server message frame.
pub fn decode_message(line: &str) -> Result<ServerMessage, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encode one server message frame.
pub fn encode_message(msg: &ServerMessage) -> String {
    serde_json::to_string(msg).unwrap_or_default()
}
