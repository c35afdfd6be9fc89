//! Full game state and move legality.
//!
//! `Game` owns a board plus everything history-dependent: whose turn it
//! is, the four castling rights, the en passant target, and the terminal
//! fields (`finished`, `winner`). It turns the pseudo-legal sets from
//! `movegen` into legal sets by simulating each candidate on a board
//! snapshot and rejecting self-check, and it appends the two special
//! moves (castling, en passant) that need game-level history.
//!
//! Self-check simulation always works on a clone of the state, never by
//! mutating the live board and undoing afterwards; a failed candidate
//! leaves the game untouched by construction.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::MoveError;
use crate::movegen::pseudo_legal_moves;
use crate::moves::Move;
use crate::piece::{Piece, PieceType};
use crate::position::{Color, Position};

/// Per-side, per-rook castling eligibility.
///
/// Every flag starts `true` and is only ever revoked, never re-granted:
/// a king move drops both of its side's flags, a rook's first move (or
/// its capture while unmoved) drops the matching one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }
}

impl CastlingRights {
    fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }

    fn revoke_kingside(&mut self, color: Color) {
        match color {
            Color::White => self.white_kingside = false,
            Color::Black => self.black_kingside = false,
        }
    }

    fn revoke_queenside(&mut self, color: Color) {
        match color {
            Color::White => self.white_queenside = false,
            Color::Black => self.black_queenside = false,
        }
    }
}

/// A chess game in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    rights: CastlingRights,
    en_passant_target: Option<Position>,
    finished: bool,
    winner: Option<String>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    /// A fresh game: standard starting position, White to move.
    pub fn new() -> Self {
        Game {
            board: Board::initial(),
            turn: Color::White,
            rights: CastlingRights::default(),
            en_passant_target: None,
            finished: false,
            winner: None,
        }
    }

    /// A game starting from an arbitrary position. Castling rights are
    /// left intact; constructed positions that should not allow castling
    /// simply omit the relevant king/rook home squares.
    pub fn from_position(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            rights: CastlingRights::default(),
            en_passant_target: None,
            finished: false,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.rights
    }

    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant_target
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Terminal fields are coordinator-driven: the engine never sets
    /// them itself during `make_move`.
    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    pub fn set_winner(&mut self, winner: Option<String>) {
        self.winner = winner;
    }

    /// Legal moves for the piece at `pos`, or `None` when the square is
    /// empty. The result is a set; callers must not rely on ordering.
    pub fn legal_moves(&self, pos: Position) -> Option<Vec<Move>> {
        let piece = self.board.get(pos)?;

        let mut legal: Vec<Move> = pseudo_legal_moves(&self.board, pos)
            .into_iter()
            .filter(|mv| !self.leaves_own_king_in_check(*mv, piece.color))
            .collect();

        if piece.kind == PieceType::King {
            self.append_castling(pos, piece.color, &mut legal);
        }
        if piece.kind == PieceType::Pawn {
            self.append_en_passant(pos, piece.color, &mut legal);
        }

        Some(legal)
    }

    /// Validate and execute `mv`. Illegal attempts never mutate state.
    pub fn make_move(&mut self, mv: Move) -> Result<(), MoveError> {
        let Some(piece) = self.board.get(mv.start) else {
            return Err(MoveError::IllegalMove(mv));
        };
        if piece.color != self.turn {
            return Err(MoveError::IllegalMove(mv));
        }
        let legal = self.legal_moves(mv.start).unwrap_or_default();
        if !legal.contains(&mv) {
            return Err(MoveError::IllegalMove(mv));
        }

        self.apply_move(mv);
        self.turn = self.turn.opposite();
        Ok(())
    }

    /// True when any opposing piece's pseudo-legal moves reach the king.
    ///
    /// # Panics
    ///
    /// Panics when `color` has no king on the board. The engine is the
    /// only mutator of a legally-reachable board, so a missing king
    /// means state corruption upstream, not a game outcome.
    pub fn is_in_check(&self, color: Color) -> bool {
        let king = match self.king_position(color) {
            Some(pos) => pos,
            None => panic!("no {color} king on board: game state corrupted"),
        };
        attacks_square(&self.board, color.opposite(), king)
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    pub fn is_in_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn king_position(&self, color: Color) -> Option<Position> {
        self.board
            .occupied()
            .find(|(_, piece)| piece.color == color && piece.kind == PieceType::King)
            .map(|(pos, _)| pos)
    }

    fn has_any_legal_move(&self, color: Color) -> bool {
        self.board
            .occupied()
            .filter(|(_, piece)| piece.color == color)
            .any(|(pos, _)| {
                self.legal_moves(pos)
                    .map(|moves| !moves.is_empty())
                    .unwrap_or(false)
            })
    }

    /// Simulate `mv` on a snapshot and report whether `color`'s king
    /// ends up attacked.
    fn leaves_own_king_in_check(&self, mv: Move, color: Color) -> bool {
        let mut sim = self.clone();
        sim.apply_move(mv);
        sim.is_in_check(color)
    }

    /// True when the king could sit on `to` without being attacked,
    /// with the board otherwise unchanged. Used for the castling
    /// pass-through squares; the king is physically placed on the
    /// snapshot so pawn attacks on the empty square are seen.
    fn king_safe_at(&self, from: Position, to: Position, color: Color) -> bool {
        let Some(king) = self.board.get(from) else {
            return false;
        };
        let mut board = self.board.clone();
        board.place(from, None);
        board.place(to, Some(king));
        !attacks_square(&board, color.opposite(), to)
    }

    fn append_castling(&self, pos: Position, color: Color, legal: &mut Vec<Move>) {
        let rank = color.back_rank();
        if pos != Position::new(rank, 5) || self.is_in_check(color) {
            return;
        }

        let empty = |col: u8| self.board.get(Position::new(rank, col)).is_none();

        if self.rights.kingside(color)
            && self.rook_at(Position::new(rank, 8), color)
            && empty(6)
            && empty(7)
            && self.king_safe_at(pos, Position::new(rank, 6), color)
            && self.king_safe_at(pos, Position::new(rank, 7), color)
        {
            legal.push(Move::new(pos, Position::new(rank, 7)));
        }

        if self.rights.queenside(color)
            && self.rook_at(Position::new(rank, 1), color)
            && empty(2)
            && empty(3)
            && empty(4)
            && self.king_safe_at(pos, Position::new(rank, 4), color)
            && self.king_safe_at(pos, Position::new(rank, 3), color)
        {
            legal.push(Move::new(pos, Position::new(rank, 3)));
        }
    }

    fn rook_at(&self, pos: Position, color: Color) -> bool {
        matches!(
            self.board.get(pos),
            Some(piece) if piece.color == color && piece.kind == PieceType::Rook
        )
    }

    fn append_en_passant(&self, pos: Position, color: Color, legal: &mut Vec<Move>) {
        let Some(target) = self.en_passant_target else {
            return;
        };

        let dir = color.pawn_direction();
        let reachable = pos.offset(dir, -1) == Some(target) || pos.offset(dir, 1) == Some(target);
        if !reachable {
            return;
        }

        let mv = Move::new(pos, target);
        if !self.leaves_own_king_in_check(mv, color) {
            legal.push(mv);
        }
    }

    /// Execute a validated (or simulated) move: relocation, promotion,
    /// en passant removal, castling rook shift, rights revocation and
    /// en passant bookkeeping. Turn flipping stays in `make_move` so
    /// simulations can reuse this directly.
    fn apply_move(&mut self, mv: Move) {
        let Some(piece) = self.board.get(mv.start) else {
            return;
        };

        let mut captured = self.board.get(mv.end);
        let mut captured_at = mv.end;

        // En passant: the captured pawn sits beside, not on, the target.
        if piece.kind == PieceType::Pawn
            && self.en_passant_target == Some(mv.end)
            && mv.start.col != mv.end.col
            && captured.is_none()
        {
            if let Some(beside) = mv.end.offset(-piece.color.pawn_direction(), 0) {
                captured = self.board.get(beside);
                captured_at = beside;
                self.board.place(beside, None);
            }
        }

        self.board.place(mv.start, None);
        let placed = match mv.promotion {
            Some(kind) => Piece::new(piece.color, kind),
            None => piece,
        };
        self.board.place(mv.end, Some(placed));

        // Castling: a king moving two files drags its rook along.
        if piece.kind == PieceType::King && mv.start.col == 5 {
            let rank = mv.start.row;
            if mv.end == Position::new(rank, 7) {
                let rook = self.board.get(Position::new(rank, 8));
                self.board.place(Position::new(rank, 8), None);
                self.board.place(Position::new(rank, 6), rook);
            } else if mv.end == Position::new(rank, 3) {
                let rook = self.board.get(Position::new(rank, 1));
                self.board.place(Position::new(rank, 1), None);
                self.board.place(Position::new(rank, 4), rook);
            }
        }

        // Rights revocation is monotonic: first king/rook move, or the
        // capture of a still-unmoved rook on its home square.
        if piece.kind == PieceType::King {
            self.rights.revoke_kingside(piece.color);
            self.rights.revoke_queenside(piece.color);
        }
        if piece.kind == PieceType::Rook {
            self.revoke_rook_right(piece.color, mv.start);
        }
        if let Some(victim) = captured {
            if victim.kind == PieceType::Rook {
                self.revoke_rook_right(victim.color, captured_at);
            }
        }

        // The en passant window is exactly one ply: set after a double
        // push, cleared by anything else.
        let double_push = piece.kind == PieceType::Pawn
            && (mv.end.row as i8 - mv.start.row as i8).abs() == 2;
        self.en_passant_target = if double_push {
            Some(Position::new((mv.start.row + mv.end.row) / 2, mv.start.col))
        } else {
            None
        };
    }

    fn revoke_rook_right(&mut self, color: Color, pos: Position) {
        let rank = color.back_rank();
        if pos == Position::new(rank, 1) {
            self.rights.revoke_queenside(color);
        } else if pos == Position::new(rank, 8) {
            self.rights.revoke_kingside(color);
        }
    }
}

/// True when any `attacker` piece has a pseudo-legal move onto `target`.
/// Pseudo-legal is the right notion here: an attack "through" one's own
/// pinned piece still gives check.
fn attacks_square(board: &Board, attacker: Color, target: Position) -> bool {
    board
        .occupied()
        .filter(|(_, piece)| piece.color == attacker)
        .any(|(pos, _)| {
            pseudo_legal_moves(board, pos)
                .iter()
                .any(|mv| mv.end == target)
        })
}
