//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Listens on the configured address/port.
//! - Accepts new TCP connections.
//! - Assigns each connection a `ConnId`.
//! - Spawns a per-connection task that reads command frames and
//!   dispatches them into the shared [`Coordinator`].
//!
//! There is no central engine task: the coordinator serializes work per
//! game with per-game mutexes, so commands against different games run
//! fully independently.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::client;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::types::{ConnId, OutboundRx, OutboundTx};

/// Counter for assigning unique `ConnId`s over the process lifetime.
static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

fn next_conn_id() -> ConnId {
    ConnId(NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed))
}

/// Run the TCP server with the given configuration and coordinator.
pub async fn run(config: Config, coordinator: Arc<Coordinator>) -> anyhow::Result<()> {
    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    // Live transports, including ones still in the Connecting state
    // (the registry only counts Joined connections).
    let live = Arc::new(AtomicUsize::new(0));

    loop {
        let (stream, peer_addr) = listener.accept().await?;

        if live.load(Ordering::Relaxed) >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Just drop the stream; the client sees the close.
            continue;
        }

        let conn_id = next_conn_id();
        info!(%conn_id, %peer_addr, "accepted connection");

        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        let coordinator = coordinator.clone();
        let live = live.clone();
        live.fetch_add(1, Ordering::Relaxed);

        tokio::spawn(async move {
            if let Err(err) =
                client::run_client(conn_id, stream, coordinator, out_tx, out_rx).await
            {
                warn!(%conn_id, %err, "connection task failed");
            } else {
                info!(%conn_id, "connection closed");
            }
            live.fetch_sub(1, Ordering::Relaxed);
        });
    }
}
