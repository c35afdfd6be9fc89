//! Pseudo-legal move generation.
//!
//! Enumerates the moves a piece could make given only its movement
//! pattern and board occupancy, ignoring whether the mover's own king
//! would be left in check. Castling and en passant are *not* produced
//! here; both depend on game-level history and are appended by
//! `Game::legal_moves`.

use crate::board::Board;
use crate::moves::Move;
use crate::piece::{Piece, PieceType};
use crate::position::Position;

const STRAIGHT_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROYAL_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const PROMOTION_CHOICES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// Pseudo-legal moves for the piece at `pos`. Empty when the square is
/// unoccupied. Callers must treat the result as a set; no ordering is
/// guaranteed.
pub fn pseudo_legal_moves(board: &Board, pos: Position) -> Vec<Move> {
    let Some(piece) = board.get(pos) else {
        return Vec::new();
    };

    match piece.kind {
        PieceType::Queen => slide(board, pos, piece, &ROYAL_DIRS),
        PieceType::Rook => slide(board, pos, piece, &STRAIGHT_DIRS),
        PieceType::Bishop => slide(board, pos, piece, &DIAGONAL_DIRS),
        PieceType::King => step(board, pos, piece, &ROYAL_DIRS),
        PieceType::Knight => step(board, pos, piece, &KNIGHT_OFFSETS),
        PieceType::Pawn => pawn_moves(board, pos, piece),
    }
}

/// Sliding pieces: walk each direction until blocked, including the
/// blocking square only when it holds an opposing piece.
fn slide(board: &Board, pos: Position, piece: Piece, dirs: &[(i8, i8)]) -> Vec<Move> {
    let mut moves = Vec::new();

    for &(d_row, d_col) in dirs {
        let mut current = pos;
        while let Some(next) = current.offset(d_row, d_col) {
            match board.get(next) {
                None => moves.push(Move::new(pos, next)),
                Some(occupant) => {
                    if occupant.color != piece.color {
                        moves.push(Move::new(pos, next));
                    }
                    break;
                }
            }
            current = next;
        }
    }

    moves
}

/// Stepping pieces: evaluate each fixed offset once.
fn step(board: &Board, pos: Position, piece: Piece, offsets: &[(i8, i8)]) -> Vec<Move> {
    let mut moves = Vec::new();

    for &(d_row, d_col) in offsets {
        if let Some(next) = pos.offset(d_row, d_col) {
            match board.get(next) {
                None => moves.push(Move::new(pos, next)),
                Some(occupant) if occupant.color != piece.color => {
                    moves.push(Move::new(pos, next));
                }
                Some(_) => {}
            }
        }
    }

    moves
}

fn pawn_moves(board: &Board, pos: Position, piece: Piece) -> Vec<Move> {
    let mut moves = Vec::new();

    let dir = piece.color.pawn_direction();
    let start_rank = piece.color.pawn_start_rank();
    let promotion_rank = piece.color.promotion_rank();

    let mut destinations: Vec<Position> = Vec::new();

    // Forward one square, only if empty.
    if let Some(one) = pos.offset(dir, 0) {
        if board.get(one).is_none() {
            destinations.push(one);

            // Forward two from the start rank; both squares must be empty.
            if pos.row == start_rank {
                if let Some(two) = pos.offset(2 * dir, 0) {
                    if board.get(two).is_none() {
                        destinations.push(two);
                    }
                }
            }
        }
    }

    // Diagonal captures, only onto an opposing piece.
    for d_col in [-1, 1] {
        if let Some(diag) = pos.offset(dir, d_col) {
            if matches!(board.get(diag), Some(occupant) if occupant.color != piece.color) {
                destinations.push(diag);
            }
        }
    }

    for end in destinations {
        if end.row == promotion_rank {
            for choice in PROMOTION_CHOICES {
                moves.push(Move::promoting(pos, end, choice));
            }
        } else {
            moves.push(Move::new(pos, end));
        }
    }

    moves
}
