//! Live game coordinator.
//!
//! Receives decoded commands from the per-connection tasks, resolves
//! identity and game through the external stores, drives the rules
//! engine, persists results, and fans out state and notifications
//! through the session registry.
//!
//! Per-game serialization: every mutating command holds that game's
//! mutex across validate -> mutate -> persist. Different game ids use
//! different mutexes and never contend. Broadcast sends go through
//! unbounded channels and are best-effort: a failed send drops that
//! connection from the registry and never blocks the other recipients.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use chess_core::{GameId, GameSession, Move};
use chess_protocol::ServerMessage;

use crate::error::CommandError;
use crate::registry::SessionRegistry;
use crate::store::{AuthStore, GameStore};
use crate::types::{ConnId, OutboundTx};

pub struct Coordinator {
    registry: Arc<SessionRegistry>,
    auth: Arc<dyn AuthStore>,
    games: Arc<dyn GameStore>,

    /// Per-game critical sections, created lazily on first use.
    locks: RwLock<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl Coordinator {
    pub fn new(
        registry: Arc<SessionRegistry>,
        auth: Arc<dyn AuthStore>,
        games: Arc<dyn GameStore>,
    ) -> Self {
        Coordinator {
            registry,
            auth,
            games,
            locks: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// `CONNECT`: register the connection (superseding any prior one
    /// for the username), send the full game state to the new
    /// connection only, and notify everyone else in the game.
    ///
    /// Errors from this handler close the transport; the client task
    /// enforces that.
    pub async fn handle_connect(
        &self,
        conn_id: ConnId,
        tx: OutboundTx,
        token: &str,
        game_id: GameId,
    ) -> Result<(), CommandError> {
        let (username, session) = self.resolve(token, game_id)?;

        if !self
            .registry
            .join(game_id, &username, conn_id, tx.clone())
            .await
        {
            return Err(CommandError::SessionConflict);
        }

        debug!(%conn_id, %game_id, username, "connection joined game");

        if tx.send(ServerMessage::load_game(session)).is_err() {
            warn!(%conn_id, "connection closed before initial load");
            self.registry.drop_all(conn_id).await;
            return Ok(());
        }

        self.broadcast(
            game_id,
            ServerMessage::notification(format!("{username} has joined the game")),
            Some(conn_id),
        )
        .await;

        Ok(())
    }

    /// `MAKE_MOVE`: validate seat and turn, drive the engine, persist,
    /// broadcast the new state to everyone and a move notification to
    /// everyone but the mover, then evaluate the new side to move for
    /// checkmate / stalemate / check.
    ///
    /// Checkmate and stalemate set `finished` (and the winner for
    /// checkmate); the updated terminal state is persisted and
    /// re-broadcast.
    pub async fn handle_make_move(
        &self,
        conn_id: ConnId,
        token: &str,
        game_id: GameId,
        mv: Move,
    ) -> Result<(), CommandError> {
        let lock = self.game_lock(game_id).await;
        let _guard = lock.lock().await;

        let (username, mut session) = self.resolve(token, game_id)?;

        if session.game.finished() {
            return Err(CommandError::GameOver);
        }
        let seat = session
            .seat_of(&username)
            .ok_or(CommandError::NotParticipant)?;
        if seat != session.game.turn() {
            return Err(CommandError::WrongTurn);
        }

        session
            .game
            .make_move(mv)
            .map_err(|_| CommandError::IllegalMove)?;

        self.games.save(&session)?;

        debug!(%conn_id, %game_id, username, %mv, "move accepted");

        self.broadcast(game_id, ServerMessage::load_game(session.clone()), None)
            .await;
        self.broadcast(
            game_id,
            ServerMessage::notification(format!("{username} made a move: {mv}")),
            Some(conn_id),
        )
        .await;

        self.evaluate_terminal(game_id, &mut session).await?;

        Ok(())
    }

    /// `LEAVE`: vacate the sender's seat (if they held one), persist,
    /// deregister, and notify the remaining connections.
    ///
    /// Idempotent: leaving a game the connection is no longer
    /// registered for is a no-op, not an error, and sends nothing.
    pub async fn handle_leave(
        &self,
        conn_id: ConnId,
        token: &str,
        game_id: GameId,
    ) -> Result<(), CommandError> {
        let lock = self.game_lock(game_id).await;
        let _guard = lock.lock().await;

        let (username, mut session) = self.resolve(token, game_id)?;

        if !self.registry.leave(game_id, conn_id).await {
            return Ok(());
        }

        if let Some(seat) = session.seat_of(&username) {
            session.clear_seat(seat);
            self.games.save(&session)?;
        }

        debug!(%conn_id, %game_id, username, "connection left game");

        self.broadcast(
            game_id,
            ServerMessage::notification(format!("{username} has left the game")),
            None,
        )
        .await;

        Ok(())
    }

    /// `RESIGN`: finish the game with the other seat as winner, persist,
    /// notify every connection (the resigner included), then evict the
    /// whole game from the registry.
    pub async fn handle_resign(
        &self,
        conn_id: ConnId,
        token: &str,
        game_id: GameId,
    ) -> Result<(), CommandError> {
        let lock = self.game_lock(game_id).await;
        let _guard = lock.lock().await;

        let (username, mut session) = self.resolve(token, game_id)?;

        if session.game.finished() {
            return Err(CommandError::GameOver);
        }
        let seat = session
            .seat_of(&username)
            .ok_or(CommandError::NotParticipant)?;

        let winner = session.username_for(seat.opposite()).map(String::from);
        session.game.set_finished(true);
        session.game.set_winner(winner.clone());
        self.games.save(&session)?;

        debug!(%conn_id, %game_id, username, "resignation");

        let text = match winner {
            Some(winner) => format!("{username} has resigned. {winner} wins!"),
            None => format!("{username} has resigned"),
        };
        self.broadcast(game_id, ServerMessage::notification(text), None)
            .await;

        self.registry.remove_game(game_id).await;

        Ok(())
    }

    /// Transport close: evict the connection everywhere and tell the
    /// games it was registered to.
    pub async fn handle_disconnect(&self, conn_id: ConnId) {
        let (username, affected) = self.registry.drop_all(conn_id).await;
        let Some(username) = username else {
            return;
        };

        for game_id in affected {
            self.broadcast(
                game_id,
                ServerMessage::notification(format!("{username} disconnected")),
                None,
            )
            .await;
        }
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn resolve(
        &self,
        token: &str,
        game_id: GameId,
    ) -> Result<(String, GameSession), CommandError> {
        let username = self
            .auth
            .validate(token)
            .ok_or(CommandError::Unauthorized)?;
        let session = self.games.find(game_id).ok_or(CommandError::NotFound)?;
        Ok((username, session))
    }

    /// Checkmate / stalemate / check evaluation for the side now to
    /// move, after a move was applied and broadcast.
    async fn evaluate_terminal(
        &self,
        game_id: GameId,
        session: &mut GameSession,
    ) -> Result<(), CommandError> {
        let next = session.game.turn();

        if session.game.is_in_checkmate(next) {
            let winner = session.username_for(next.opposite()).map(String::from);
            session.game.set_finished(true);
            session.game.set_winner(winner.clone());
            self.games.save(session)?;

            self.broadcast(game_id, ServerMessage::load_game(session.clone()), None)
                .await;
            let text = match winner {
                Some(winner) => format!("Checkmate! {next} loses. {winner} wins!"),
                None => format!("Checkmate! {next} loses."),
            };
            self.broadcast(game_id, ServerMessage::notification(text), None)
                .await;
        } else if session.game.is_in_stalemate(next) {
            session.game.set_finished(true);
            self.games.save(session)?;

            self.broadcast(game_id, ServerMessage::load_game(session.clone()), None)
                .await;
            self.broadcast(
                game_id,
                ServerMessage::notification("Stalemate! It's a draw."),
                None,
            )
            .await;
        } else if session.game.is_in_check(next) {
            self.broadcast(
                game_id,
                ServerMessage::notification(format!("Check on {next}")),
                None,
            )
            .await;
        }

        Ok(())
    }

    /// The critical-section mutex for `game_id`, created on first use.
    async fn game_lock(&self, game_id: GameId) -> Arc<Mutex<()>> {
        {
            let locks = self.locks.read().await;
            if let Some(lock) = locks.get(&game_id) {
                return lock.clone();
            }
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Best-effort fan-out to every registered connection of a game,
    /// optionally skipping one (the originator). A failed send is
    /// logged and that connection dropped; delivery to the others
    /// continues.
    async fn broadcast(&self, game_id: GameId, msg: ServerMessage, except: Option<ConnId>) {
        for (conn_id, tx) in self.registry.connections_for(game_id).await {
            if Some(conn_id) == except {
                continue;
            }
            if tx.send(msg.clone()).is_err() {
                warn!(%conn_id, %game_id, "broadcast send failed; dropping connection");
                self.registry.drop_all(conn_id).await;
            }
        }
    }
}
