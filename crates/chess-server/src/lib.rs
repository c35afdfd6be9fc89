//! chess-server
//!
//! Multi-client async TCP server for live chess games: one task per
//! connection, a shared session registry, and a coordinator that
//! serializes all mutations per game.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod registry;
pub mod server;
pub mod store;
pub mod types;

// internal module, not re-exported
mod client;
