//! TCP server binary for live chess games.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use chess_core::GameId;
use chess_server::config::Config;
use chess_server::coordinator::Coordinator;
use chess_server::registry::SessionRegistry;
use chess_server::server;
use chess_server::store::{GameStore, MemoryAuthStore, MemoryGameStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    // Account registration, token issuance and game creation belong to
    // the external facade; the standalone binary seeds one demo game
    // with two seated players so it is usable end-to-end.
    let auth = Arc::new(MemoryAuthStore::new());
    auth.insert_token("white-token", "alice");
    auth.insert_token("black-token", "bob");

    let games = Arc::new(MemoryGameStore::new());
    let mut demo = games.create_game(GameId(1), "demo");
    demo.white_username = Some("alice".to_string());
    demo.black_username = Some("bob".to_string());
    games
        .save(&demo)
        .map_err(|e| anyhow::anyhow!("seeding demo game: {e}"))?;
    info!(game_id = %demo.game_id, "seeded demo game (tokens: white-token, black-token)");

    let registry = Arc::new(SessionRegistry::new());
    let coordinator = Arc::new(Coordinator::new(registry, auth, games));

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        max_clients = config.max_clients,
        "starting chess-server"
    );

    server::run(config, coordinator).await
}
