//! Session registry: who is listening to which game.
//!
//! Pure bookkeeping, independent of game rules. A username may hold at
//! most one live connection system-wide; registering a second one
//! supersedes (evicts) the first everywhere. The registry is an
//! explicit object owned by the server process and handed to the
//! coordinator by reference, so tests construct isolated instances.
//!
//! A single coarse `RwLock` over the internal maps is enough here:
//! critical sections are tiny map operations with no awaits inside, and
//! contention is per-process, not per-game.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use chess_core::GameId;

use crate::types::{ConnId, OutboundTx};

#[derive(Debug, Default)]
struct Inner {
    /// Game -> connections registered for its broadcasts.
    game_conns: HashMap<GameId, HashSet<ConnId>>,

    /// Connection -> outbound channel to its writer task.
    senders: HashMap<ConnId, OutboundTx>,

    /// Username index, both directions.
    conn_user: HashMap<ConnId, String>,
    user_conn: HashMap<String, ConnId>,
}

impl Inner {
    /// Remove a connection from every structure it appears in.
    fn evict(&mut self, conn_id: ConnId) -> Vec<GameId> {
        let mut affected = Vec::new();

        self.game_conns.retain(|game_id, conns| {
            if conns.remove(&conn_id) {
                affected.push(*game_id);
            }
            !conns.is_empty()
        });

        self.senders.remove(&conn_id);
        if let Some(username) = self.conn_user.remove(&conn_id) {
            // Only unlink the index entry if it still points at us; the
            // username may already have been superseded by a newer
            // connection.
            if self.user_conn.get(&username) == Some(&conn_id) {
                self.user_conn.remove(&username);
            }
        }

        affected
    }
}

/// Registry of live connections per game, with a one-connection-per-
/// username invariant.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    inner: RwLock<Inner>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    /// Register `conn_id` under `game_id` as `username`.
    ///
    /// Supersede semantics: an older connection held by the same
    /// username is evicted from every game and the username index
    /// first. Returns `false` only on a structural violation, namely
    /// the same connection object registering under a different
    /// username.
    pub async fn join(
        &self,
        game_id: GameId,
        username: &str,
        conn_id: ConnId,
        tx: OutboundTx,
    ) -> bool {
        let mut inner = self.inner.write().await;

        if let Some(&old) = inner.user_conn.get(username) {
            if old != conn_id {
                inner.evict(old);
            }
        }

        if let Some(existing) = inner.conn_user.get(&conn_id) {
            if existing != username {
                return false;
            }
        }

        inner.game_conns.entry(game_id).or_default().insert(conn_id);
        inner.senders.insert(conn_id, tx);
        inner.conn_user.insert(conn_id, username.to_string());
        inner.user_conn.insert(username.to_string(), conn_id);
        true
    }

    /// Deregister `conn_id` from `game_id` and the username index.
    /// Idempotent: returns `false` (and does nothing) when the
    /// connection was not registered for that game.
    pub async fn leave(&self, game_id: GameId, conn_id: ConnId) -> bool {
        let mut inner = self.inner.write().await;

        let removed = match inner.game_conns.get_mut(&game_id) {
            Some(conns) => conns.remove(&conn_id),
            None => false,
        };
        if !removed {
            return false;
        }

        if inner
            .game_conns
            .get(&game_id)
            .is_some_and(|conns| conns.is_empty())
        {
            inner.game_conns.remove(&game_id);
        }

        inner.senders.remove(&conn_id);
        if let Some(username) = inner.conn_user.remove(&conn_id) {
            if inner.user_conn.get(&username) == Some(&conn_id) {
                inner.user_conn.remove(&username);
            }
        }

        true
    }

    /// Transport-close path: remove the connection everywhere. Returns
    /// the username it was registered as and the games it was evicted
    /// from, for close notifications.
    pub async fn drop_all(&self, conn_id: ConnId) -> (Option<String>, Vec<GameId>) {
        let mut inner = self.inner.write().await;
        let username = inner.conn_user.get(&conn_id).cloned();
        let affected = inner.evict(conn_id);
        (username, affected)
    }

    /// Snapshot of connections registered for `game_id`, for broadcast.
    /// Empty for unknown game ids.
    pub async fn connections_for(&self, game_id: GameId) -> Vec<(ConnId, OutboundTx)> {
        let inner = self.inner.read().await;
        match inner.game_conns.get(&game_id) {
            Some(conns) => conns
                .iter()
                .filter_map(|conn_id| {
                    inner
                        .senders
                        .get(conn_id)
                        .map(|tx| (*conn_id, tx.clone()))
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Administrative bulk eviction when a game concludes. Dropping the
    /// senders closes each participant's writer channel.
    pub async fn remove_game(&self, game_id: GameId) {
        let mut inner = self.inner.write().await;
        let Some(conns) = inner.game_conns.remove(&game_id) else {
            return;
        };
        for conn_id in conns {
            // A connection registers against one game, so full eviction
            // is the right cleanup.
            inner.evict(conn_id);
        }
    }

    /// The username `conn_id` is registered as, if any.
    pub async fn username_of(&self, conn_id: ConnId) -> Option<String> {
        let inner = self.inner.read().await;
        inner.conn_user.get(&conn_id).cloned()
    }

    /// Number of currently registered connections.
    pub async fn connection_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.senders.len()
    }
}
