//! Per-connection I/O loop.
//!
//! Each connection gets one task that blocks on reads, decodes
//! newline-delimited JSON command frames, and dispatches synchronously
//! into the coordinator. A companion writer task drains the outbound
//! channel and writes frames back.
//!
//! Connection state machine: Connecting -> Joined -> Closed. Any
//! failure while still Connecting (bad frame, rejected `CONNECT`)
//! terminates the transport; once Joined, rejected commands only send
//! an `ERROR` frame back and the connection stays open. An explicit
//! accepted `LEAVE` closes the connection.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use chess_protocol::{json_codec, ClientCommand, ServerMessage};

use crate::coordinator::Coordinator;
use crate::error::CommandError;
use crate::types::{ConnId, OutboundRx, OutboundTx};

/// Run the I/O loop for a single connection until it closes.
pub(crate) async fn run_client(
    conn_id: ConnId,
    stream: TcpStream,
    coordinator: Arc<Coordinator>,
    out_tx: OutboundTx,
    out_rx: OutboundRx,
) -> anyhow::Result<()> {
    let (mut read_half, write_half) = stream.into_split();

    let writer = tokio::spawn(write_loop(conn_id, write_half, out_rx));

    let mut joined = false;
    let mut buffer: Vec<u8> = Vec::new();
    let mut temp = [0u8; 1024];

    'read: loop {
        match read_half.read(&mut temp).await {
            Ok(0) => {
                debug!(%conn_id, "connection closed by peer");
                break;
            }
            Ok(n) => {
                buffer.extend_from_slice(&temp[..n]);

                while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=newline).collect();
                    let line = String::from_utf8_lossy(&line);
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let cmd = match json_codec::decode_command(line) {
                        Ok(cmd) => cmd,
                        Err(err) => {
                            debug!(%conn_id, %err, "undecodable command frame");
                            send(&out_tx, ServerMessage::error(CommandError::BadCommand.to_string()));
                            if joined {
                                continue;
                            }
                            break 'read;
                        }
                    };

                    if dispatch(conn_id, &coordinator, &out_tx, cmd, &mut joined).await {
                        break 'read;
                    }
                }
            }
            Err(err) => {
                warn!(%conn_id, %err, "read error");
                break;
            }
        }
    }

    coordinator.handle_disconnect(conn_id).await;

    // Drop our sender so the writer drains whatever is queued and exits.
    drop(out_tx);
    let _ = writer.await;

    Ok(())
}

/// Handle one decoded command. Returns `true` when the connection
/// should close.
async fn dispatch(
    conn_id: ConnId,
    coordinator: &Coordinator,
    out_tx: &OutboundTx,
    cmd: ClientCommand,
    joined: &mut bool,
) -> bool {
    match cmd {
        ClientCommand::Connect {
            auth_token,
            game_id,
        } => {
            match coordinator
                .handle_connect(conn_id, out_tx.clone(), &auth_token, game_id)
                .await
            {
                Ok(()) => {
                    *joined = true;
                    false
                }
                Err(err) => {
                    // Unauthorized / NotFound on CONNECT terminate the
                    // transport.
                    send(out_tx, ServerMessage::error(err.to_string()));
                    true
                }
            }
        }

        _ if !*joined => {
            send(
                out_tx,
                ServerMessage::error("Error: not connected".to_string()),
            );
            true
        }

        ClientCommand::MakeMove {
            auth_token,
            game_id,
            mv,
        } => {
            if let Err(err) = coordinator
                .handle_make_move(conn_id, &auth_token, game_id, mv)
                .await
            {
                send(out_tx, ServerMessage::error(err.to_string()));
            }
            false
        }

        ClientCommand::Leave {
            auth_token,
            game_id,
        } => match coordinator.handle_leave(conn_id, &auth_token, game_id).await {
            Ok(()) => {
                info!(%conn_id, %game_id, "connection left game, closing");
                true
            }
            Err(err) => {
                send(out_tx, ServerMessage::error(err.to_string()));
                false
            }
        },

        ClientCommand::Resign {
            auth_token,
            game_id,
        } => {
            if let Err(err) = coordinator
                .handle_resign(conn_id, &auth_token, game_id)
                .await
            {
                send(out_tx, ServerMessage::error(err.to_string()));
            }
            false
        }
    }
}

fn send(out_tx: &OutboundTx, msg: ServerMessage) {
    // Writer gone means the transport is closing anyway.
    let _ = out_tx.send(msg);
}

/// Writer task: consume server messages and write them as frames.
async fn write_loop(conn_id: ConnId, mut write_half: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(msg) = out_rx.recv().await {
        let frame = format!("{}\n", json_codec::encode_message(&msg));
        if let Err(err) = write_half.write_all(frame.as_bytes()).await {
            warn!(%conn_id, %err, "write error");
            break;
        }
        if let Err(err) = write_half.flush().await {
            warn!(%conn_id, %err, "flush error");
            break;
        }
    }
}
