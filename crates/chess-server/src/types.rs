//! Shared types for the chess TCP server.
//!
//! This module defines:
//! - `ConnId`: a lightweight handle for connected clients
//! - outbound channel aliases from the coordinator to client writers

use chess_protocol::ServerMessage;
use tokio::sync::mpsc;

/// Identifier for a live connection.
///
/// Intentionally opaque; we just guarantee uniqueness over the lifetime
/// of the process. One `ConnId` maps to exactly one transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnId(pub u64);

impl std::fmt::Display for ConnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound messages from the coordinator to a given connection's
/// writer task. Sends are best-effort; a closed receiver means the
/// transport is gone and the registry entry gets dropped.
pub type OutboundTx = mpsc::UnboundedSender<ServerMessage>;
pub type OutboundRx = mpsc::UnboundedReceiver<ServerMessage>;
