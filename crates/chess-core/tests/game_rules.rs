//! Game-level rules scenarios: legality filtering, special moves,
//! terminal detection.

use chess_core::{Board, Color, Game, Move, MoveError, Piece, PieceType, Position};

fn pos(row: u8, col: u8) -> Position {
    Position::new(row, col)
}

fn mv(start: Position, end: Position) -> Move {
    Move::new(start, end)
}

fn place(board: &mut Board, row: u8, col: u8, color: Color, kind: PieceType) {
    board.place(pos(row, col), Some(Piece::new(color, kind)));
}

/// Kings-and-rooks skeleton used by the castling scenarios.
fn castling_position() -> Game {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 1, 1, Color::White, PieceType::Rook);
    place(&mut board, 1, 8, Color::White, PieceType::Rook);
    place(&mut board, 8, 5, Color::Black, PieceType::King);
    Game::from_position(board, Color::White)
}

// -----------------------------------------------------------------------------
// Self-check invariant
// -----------------------------------------------------------------------------

#[test]
fn no_legal_move_leaves_own_king_attacked() {
    let game = Game::new();
    for (start, piece) in game.board().occupied() {
        if piece.color != Color::White {
            continue;
        }
        for candidate in game.legal_moves(start).unwrap() {
            let mut sim = game.clone();
            sim.make_move(candidate).unwrap();
            assert!(
                !sim.is_in_check(Color::White),
                "{candidate} leaves White in check"
            );
        }
    }
}

#[test]
fn pinned_rook_may_only_move_along_the_pin() {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 2, 5, Color::White, PieceType::Rook);
    place(&mut board, 8, 5, Color::Black, PieceType::Rook);
    place(&mut board, 8, 1, Color::Black, PieceType::King);
    let game = Game::from_position(board, Color::White);

    let legal = game.legal_moves(pos(2, 5)).unwrap();
    assert!(!legal.is_empty());
    for candidate in legal {
        assert_eq!(candidate.end.col, 5, "{candidate} would expose the king");
    }
}

// -----------------------------------------------------------------------------
// Illegal moves never mutate
// -----------------------------------------------------------------------------

#[test]
fn illegal_move_is_rejected_without_mutation() {
    let mut game = Game::new();
    let before = game.clone();

    let err = game.make_move(mv(pos(2, 5), pos(5, 5))).unwrap_err();
    assert!(matches!(err, MoveError::IllegalMove(_)));
    assert_eq!(game, before);
}

#[test]
fn moving_out_of_turn_is_rejected_without_mutation() {
    let mut game = Game::new();
    let before = game.clone();

    // Black pawn push while it is White's turn.
    let err = game.make_move(mv(pos(7, 5), pos(5, 5))).unwrap_err();
    assert!(matches!(err, MoveError::IllegalMove(_)));
    assert_eq!(game, before);
    assert_eq!(game.board(), before.board());
}

// -----------------------------------------------------------------------------
// En passant
// -----------------------------------------------------------------------------

#[test]
fn double_push_sets_target_on_the_skipped_square() {
    let mut game = Game::new();
    game.make_move(mv(pos(2, 5), pos(4, 5))).unwrap();
    assert_eq!(game.en_passant_target(), Some(pos(3, 5)));
}

#[test]
fn any_other_move_clears_the_target() {
    let mut game = Game::new();
    game.make_move(mv(pos(2, 5), pos(4, 5))).unwrap();
    game.make_move(mv(pos(7, 1), pos(6, 1))).unwrap();
    assert_eq!(game.en_passant_target(), None);
}

#[test]
fn en_passant_capture_removes_the_pawn_beside_the_target() {
    let mut game = Game::new();
    game.make_move(mv(pos(2, 4), pos(4, 4))).unwrap(); // d2d4
    game.make_move(mv(pos(7, 1), pos(6, 1))).unwrap(); // a7a6
    game.make_move(mv(pos(4, 4), pos(5, 4))).unwrap(); // d4d5
    game.make_move(mv(pos(7, 3), pos(5, 3))).unwrap(); // c7c5

    assert_eq!(game.en_passant_target(), Some(pos(6, 3)));

    let capture = mv(pos(5, 4), pos(6, 3));
    assert!(game.legal_moves(pos(5, 4)).unwrap().contains(&capture));

    game.make_move(capture).unwrap();
    assert_eq!(
        game.board().get(pos(6, 3)),
        Some(Piece::new(Color::White, PieceType::Pawn))
    );
    assert_eq!(game.board().get(pos(5, 3)), None, "captured pawn removed");
}

#[test]
fn en_passant_expires_after_one_ply() {
    let mut game = Game::new();
    game.make_move(mv(pos(2, 4), pos(4, 4))).unwrap(); // d2d4
    game.make_move(mv(pos(7, 1), pos(6, 1))).unwrap(); // a7a6
    game.make_move(mv(pos(4, 4), pos(5, 4))).unwrap(); // d4d5
    game.make_move(mv(pos(7, 3), pos(5, 3))).unwrap(); // c7c5

    // White declines the capture...
    game.make_move(mv(pos(2, 1), pos(3, 1))).unwrap(); // a2a3
    game.make_move(mv(pos(6, 1), pos(5, 1))).unwrap(); // a6a5

    // ...and the window is gone.
    let capture = mv(pos(5, 4), pos(6, 3));
    assert!(!game.legal_moves(pos(5, 4)).unwrap().contains(&capture));
}

// -----------------------------------------------------------------------------
// Castling
// -----------------------------------------------------------------------------

#[test]
fn both_castles_available_with_clear_back_rank() {
    let game = castling_position();
    let legal = game.legal_moves(pos(1, 5)).unwrap();
    assert!(legal.contains(&mv(pos(1, 5), pos(1, 7))), "kingside");
    assert!(legal.contains(&mv(pos(1, 5), pos(1, 3))), "queenside");
}

#[test]
fn kingside_castle_relocates_the_rook() {
    let mut game = castling_position();
    game.make_move(mv(pos(1, 5), pos(1, 7))).unwrap();

    assert_eq!(
        game.board().get(pos(1, 7)),
        Some(Piece::new(Color::White, PieceType::King))
    );
    assert_eq!(
        game.board().get(pos(1, 6)),
        Some(Piece::new(Color::White, PieceType::Rook))
    );
    assert_eq!(game.board().get(pos(1, 8)), None);

    let rights = game.castling_rights();
    assert!(!rights.white_kingside && !rights.white_queenside);
}

#[test]
fn rook_move_revokes_that_side_permanently() {
    let mut game = castling_position();

    game.make_move(mv(pos(1, 8), pos(2, 8))).unwrap(); // Rh1-h2
    game.make_move(mv(pos(8, 5), pos(7, 5))).unwrap(); // Ke8-e7

    let legal = game.legal_moves(pos(1, 5)).unwrap();
    assert!(!legal.contains(&mv(pos(1, 5), pos(1, 7))), "kingside gone");
    assert!(legal.contains(&mv(pos(1, 5), pos(1, 3))), "queenside kept");

    // Returning the rook home does not restore the right.
    game.make_move(mv(pos(2, 8), pos(1, 8))).unwrap();
    game.make_move(mv(pos(7, 5), pos(8, 5))).unwrap();
    let legal = game.legal_moves(pos(1, 5)).unwrap();
    assert!(!legal.contains(&mv(pos(1, 5), pos(1, 7))));
    assert!(!game.castling_rights().white_kingside);
}

#[test]
fn capturing_an_unmoved_rook_revokes_its_right() {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 1, 1, Color::White, PieceType::Rook);
    place(&mut board, 1, 8, Color::White, PieceType::Rook);
    place(&mut board, 8, 5, Color::Black, PieceType::King);
    place(&mut board, 8, 8, Color::Black, PieceType::Rook);
    let mut game = Game::from_position(board, Color::Black);

    game.make_move(mv(pos(8, 8), pos(1, 8))).unwrap(); // Rh8xh1
    assert!(!game.castling_rights().white_kingside);
    assert!(game.castling_rights().white_queenside);
}

#[test]
fn castle_unavailable_through_an_attacked_square() {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 1, 8, Color::White, PieceType::Rook);
    place(&mut board, 8, 6, Color::Black, PieceType::Rook); // covers f1
    place(&mut board, 8, 1, Color::Black, PieceType::King);
    let game = Game::from_position(board, Color::White);

    let legal = game.legal_moves(pos(1, 5)).unwrap();
    assert!(!legal.contains(&mv(pos(1, 5), pos(1, 7))));
}

#[test]
fn castle_unavailable_while_in_check() {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 1, 8, Color::White, PieceType::Rook);
    place(&mut board, 8, 5, Color::Black, PieceType::Rook); // checks e1
    place(&mut board, 8, 1, Color::Black, PieceType::King);
    let game = Game::from_position(board, Color::White);

    assert!(game.is_in_check(Color::White));
    let legal = game.legal_moves(pos(1, 5)).unwrap();
    assert!(!legal.contains(&mv(pos(1, 5), pos(1, 7))));
}

// -----------------------------------------------------------------------------
// Promotion through make_move
// -----------------------------------------------------------------------------

#[test]
fn promotion_replaces_the_pawn() {
    let mut board = Board::new();
    place(&mut board, 7, 1, Color::White, PieceType::Pawn);
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 8, 5, Color::Black, PieceType::King);
    let mut game = Game::from_position(board, Color::White);

    // The non-promoting form is not a member of the legal set.
    let plain = mv(pos(7, 1), pos(8, 1));
    assert!(game.make_move(plain).is_err());

    game.make_move(Move::promoting(pos(7, 1), pos(8, 1), PieceType::Queen))
        .unwrap();
    assert_eq!(
        game.board().get(pos(8, 1)),
        Some(Piece::new(Color::White, PieceType::Queen))
    );
}

// -----------------------------------------------------------------------------
// Check, checkmate, stalemate
// -----------------------------------------------------------------------------

#[test]
fn rook_on_open_file_gives_check() {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    place(&mut board, 8, 5, Color::Black, PieceType::Rook);
    place(&mut board, 8, 1, Color::Black, PieceType::King);
    let game = Game::from_position(board, Color::White);

    assert!(game.is_in_check(Color::White));
    assert!(!game.is_in_check(Color::Black));
}

#[test]
fn fools_mate_is_checkmate_for_white() {
    let mut game = Game::new();
    game.make_move(mv(pos(2, 6), pos(3, 6))).unwrap(); // f2f3
    game.make_move(mv(pos(7, 5), pos(5, 5))).unwrap(); // e7e5
    game.make_move(mv(pos(2, 7), pos(4, 7))).unwrap(); // g2g4
    game.make_move(mv(pos(8, 4), pos(4, 8))).unwrap(); // Qd8h4#

    assert!(game.is_in_check(Color::White));
    assert!(game.is_in_checkmate(Color::White));
    assert!(!game.is_in_stalemate(Color::White));

    for (start, piece) in game.board().occupied() {
        if piece.color == Color::White {
            assert!(
                game.legal_moves(start).unwrap().is_empty(),
                "white piece at {start} still has moves"
            );
        }
    }
}

#[test]
fn cornered_king_with_no_moves_is_stalemate() {
    let mut board = Board::new();
    place(&mut board, 8, 1, Color::Black, PieceType::King); // Ka8
    place(&mut board, 7, 3, Color::White, PieceType::Queen); // Qc7
    place(&mut board, 5, 3, Color::White, PieceType::King); // Kc5
    let game = Game::from_position(board, Color::Black);

    assert!(!game.is_in_check(Color::Black));
    assert!(game.is_in_stalemate(Color::Black));
    assert!(!game.is_in_checkmate(Color::Black));
}

#[test]
#[should_panic(expected = "no BLACK king")]
fn missing_king_is_a_fatal_invariant_violation() {
    let mut board = Board::new();
    place(&mut board, 1, 5, Color::White, PieceType::King);
    let game = Game::from_position(board, Color::White);
    let _ = game.is_in_check(Color::Black);
}
