//! Interactive line client for the chess server.
//!
//! Usage:
//!   cargo run --example tcp_client
//!
//! Commands:
//!   connect <token> <game-id>
//!   move <from><to>[=Q|R|B|N]     e.g. `move e2e4`, `move a7a8=Q`
//!   leave
//!   resign
//!   quit

use std::env;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use chess_core::{GameId, Move, PieceType, Position};
use chess_protocol::{json_codec, ClientCommand, ServerMessage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let addr = env::var("CHESS_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9000".to_string());

    println!("Connecting to {addr}...");
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected. Type `connect <token> <game-id>` first.");

    let (read_half, mut write_half) = stream.into_split();

    // Printer task: show every frame the server pushes.
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match json_codec::decode_message(&line) {
                Ok(ServerMessage::LoadGame { game }) => {
                    println!("\n[{}] {} to move", game.game_name, game.game.turn());
                    println!("{}", game.game.board());
                }
                Ok(ServerMessage::Notification { message }) => println!("* {message}"),
                Ok(ServerMessage::Error { error_message }) => println!("! {error_message}"),
                Err(err) => println!("! undecodable frame: {err}"),
            }
        }
        println!("Server closed the connection.");
    });

    let mut token = String::new();
    let mut game_id = GameId(0);

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let cmd = match words.as_slice() {
            ["connect", t, g] => {
                token = t.to_string();
                game_id = GameId(g.parse()?);
                ClientCommand::Connect {
                    auth_token: token.clone(),
                    game_id,
                }
            }
            ["move", coords] => match parse_move(coords) {
                Some(mv) => ClientCommand::MakeMove {
                    auth_token: token.clone(),
                    game_id,
                    mv,
                },
                None => {
                    println!("could not parse move (try e2e4 or a7a8=Q)");
                    continue;
                }
            },
            ["leave"] => ClientCommand::Leave {
                auth_token: token.clone(),
                game_id,
            },
            ["resign"] => ClientCommand::Resign {
                auth_token: token.clone(),
                game_id,
            },
            ["quit"] | ["exit"] => break,
            [] => continue,
            _ => {
                println!("unknown command");
                continue;
            }
        };

        let frame = format!("{}\n", json_codec::encode_command(&cmd));
        write_half.write_all(frame.as_bytes()).await?;
        write_half.flush().await?;
    }

    Ok(())
}

/// Parse coordinate notation like `e2e4` or `a7a8=Q`.
fn parse_move(s: &str) -> Option<Move> {
    let bytes = s.as_bytes();
    if bytes.len() < 4 {
        return None;
    }

    let square = |file: u8, rank: u8| -> Option<Position> {
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return None;
        }
        Some(Position::new(rank - b'0', file - b'a' + 1))
    };

    let start = square(bytes[0], bytes[1])?;
    let end = square(bytes[2], bytes[3])?;

    let promotion = match bytes.get(4..) {
        Some([b'=', p]) => Some(match p.to_ascii_uppercase() {
            b'Q' => PieceType::Queen,
            b'R' => PieceType::Rook,
            b'B' => PieceType::Bishop,
            b'N' => PieceType::Knight,
            _ => return None,
        }),
        Some([]) | None => None,
        _ => return None,
    };

    Some(Move {
        start,
        end,
        promotion,
    })
}
