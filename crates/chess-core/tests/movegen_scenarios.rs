//! Pseudo-legal generation scenarios per piece type.

use chess_core::{
    pseudo_legal_moves, Board, Color, Move, Piece, PieceType, Position,
};

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col)
}

fn ends(board: &Board, from: Position) -> Vec<Position> {
    pseudo_legal_moves(board, from)
        .into_iter()
        .map(|mv| mv.end)
        .collect()
}

#[test]
fn empty_square_yields_no_moves() {
    let board = Board::initial();
    assert!(pseudo_legal_moves(&board, pos(4, 4)).is_empty());
}

#[test]
fn knight_jumps_from_initial_position() {
    let board = Board::initial();
    let mut targets = ends(&board, pos(1, 2));
    targets.sort();
    assert_eq!(targets, vec![pos(3, 1), pos(3, 3)]);
}

#[test]
fn rook_is_blocked_by_own_pieces() {
    let board = Board::initial();
    assert!(ends(&board, pos(1, 1)).is_empty());
}

#[test]
fn sliding_piece_stops_at_first_enemy() {
    let mut board = Board::new();
    board.place(pos(4, 4), Some(Piece::new(Color::White, PieceType::Rook)));
    board.place(pos(4, 7), Some(Piece::new(Color::Black, PieceType::Pawn)));

    let targets = ends(&board, pos(4, 4));
    assert!(targets.contains(&pos(4, 7)), "capture square included");
    assert!(!targets.contains(&pos(4, 8)), "walk stops at the blocker");
}

#[test]
fn pawn_single_and_double_push_from_start_rank() {
    let board = Board::initial();
    let mut targets = ends(&board, pos(2, 5));
    targets.sort();
    assert_eq!(targets, vec![pos(3, 5), pos(4, 5)]);
}

#[test]
fn pawn_blocked_ahead_cannot_push() {
    let mut board = Board::initial();
    board.place(pos(3, 5), Some(Piece::new(Color::Black, PieceType::Knight)));
    // Straight ahead is occupied and there is nothing to capture.
    let targets = ends(&board, pos(2, 5));
    assert!(targets.is_empty());
}

#[test]
fn pawn_double_push_needs_both_squares_empty() {
    let mut board = Board::initial();
    board.place(pos(4, 5), Some(Piece::new(Color::Black, PieceType::Knight)));
    let targets = ends(&board, pos(2, 5));
    assert_eq!(targets, vec![pos(3, 5)]);
}

#[test]
fn pawn_captures_diagonally_only_onto_enemy() {
    let mut board = Board::new();
    board.place(pos(4, 4), Some(Piece::new(Color::White, PieceType::Pawn)));
    board.place(pos(5, 3), Some(Piece::new(Color::Black, PieceType::Pawn)));
    board.place(pos(5, 5), Some(Piece::new(Color::White, PieceType::Pawn)));

    let targets = ends(&board, pos(4, 4));
    assert!(targets.contains(&pos(5, 3)), "enemy diagonal is a capture");
    assert!(!targets.contains(&pos(5, 5)), "own piece is not capturable");
    assert!(targets.contains(&pos(5, 4)), "forward push still there");
}

#[test]
fn pawn_on_seventh_emits_one_move_per_promotion_choice() {
    let mut board = Board::new();
    board.place(pos(7, 1), Some(Piece::new(Color::White, PieceType::Pawn)));

    let moves = pseudo_legal_moves(&board, pos(7, 1));
    assert_eq!(moves.len(), 4);
    for kind in [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ] {
        assert!(moves.contains(&Move::promoting(pos(7, 1), pos(8, 1), kind)));
    }
    // No plain non-promoting move to the back rank.
    assert!(!moves.contains(&Move::new(pos(7, 1), pos(8, 1))));
}

#[test]
fn promotion_applies_to_captures_too() {
    let mut board = Board::new();
    board.place(pos(7, 1), Some(Piece::new(Color::White, PieceType::Pawn)));
    board.place(pos(8, 2), Some(Piece::new(Color::Black, PieceType::Rook)));

    let moves = pseudo_legal_moves(&board, pos(7, 1));
    // Four promotions straight ahead, four capturing toward b8.
    assert_eq!(moves.len(), 8);
    assert!(moves.contains(&Move::promoting(pos(7, 1), pos(8, 2), PieceType::Knight)));
}

#[test]
fn king_steps_once_in_every_direction() {
    let mut board = Board::new();
    board.place(pos(4, 4), Some(Piece::new(Color::White, PieceType::King)));
    assert_eq!(ends(&board, pos(4, 4)).len(), 8);
}
