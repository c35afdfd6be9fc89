//! External-collaborator store contracts.
//!
//! The coordinator consumes two collaborator interfaces: token
//! resolution and game persistence. Registration, token issuance and
//! the create/list/join facade live outside this workspace; the
//! in-memory implementations below back the standalone binary and let
//! tests construct isolated instances.
//!
//! Store methods are synchronous: the in-memory maps never block, and a
//! future relational implementation would wrap its own pooling.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use chess_core::{GameId, GameSession};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store rejected or lost the write.
    #[error("data access error: {0}")]
    DataAccess(String),
}

/// Token -> username resolution.
pub trait AuthStore: Send + Sync {
    /// The username the token was issued to, or `None` for an unknown
    /// or revoked token.
    fn validate(&self, token: &str) -> Option<String>;
}

/// GameSession lookup and persistence.
pub trait GameStore: Send + Sync {
    fn find(&self, game_id: GameId) -> Option<GameSession>;

    fn save(&self, session: &GameSession) -> Result<(), StoreError>;
}

/// In-memory token table.
#[derive(Debug, Default)]
pub struct MemoryAuthStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        MemoryAuthStore::default()
    }

    /// Register a token for `username`. In production this is the auth
    /// facade's job; here it backs bootstrap and tests.
    pub fn insert_token(&self, token: impl Into<String>, username: impl Into<String>) {
        let mut tokens = self.tokens.write().unwrap_or_else(|e| e.into_inner());
        tokens.insert(token.into(), username.into());
    }
}

impl AuthStore for MemoryAuthStore {
    fn validate(&self, token: &str) -> Option<String> {
        let tokens = self.tokens.read().unwrap_or_else(|e| e.into_inner());
        tokens.get(token).cloned()
    }
}

/// In-memory game table.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: RwLock<HashMap<GameId, GameSession>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        MemoryGameStore::default()
    }

    /// Create and store a fresh session, both seats vacant.
    pub fn create_game(&self, game_id: GameId, game_name: impl Into<String>) -> GameSession {
        let session = GameSession::new(game_id, game_name);
        let mut games = self.games.write().unwrap_or_else(|e| e.into_inner());
        games.insert(game_id, session.clone());
        session
    }
}

impl GameStore for MemoryGameStore {
    fn find(&self, game_id: GameId) -> Option<GameSession> {
        let games = self.games.read().unwrap_or_else(|e| e.into_inner());
        games.get(&game_id).cloned()
    }

    fn save(&self, session: &GameSession) -> Result<(), StoreError> {
        let mut games = self.games.write().unwrap_or_else(|e| e.into_inner());
        games.insert(session.game_id, session.clone());
        Ok(())
    }
}
