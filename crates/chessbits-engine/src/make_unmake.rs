//! Applying and retracting moves in place.

use chessbits_core::{Color, ColoredPiece, Move, Piece, Square};

use crate::movegen::attacks::pawn_attacks;
use crate::movegen::castling::rook_travel;
use crate::movegen::{en_passant_is_legal, en_passant_victim};
use crate::position::CastlingRights;
use crate::zobrist::ZOBRIST;
use crate::Position;

/// State a move destroys, kept so it can be retracted exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    pub captured: Option<(ColoredPiece, Square)>,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub hash: u64,
}

impl Position {
    /// Plays `mv`, which must be a move generated for this position.
    ///
    /// The hash is updated incrementally. The en passant target is only set
    /// after a double push when the opponent can actually capture en passant.
    pub fn make(&mut self, mv: Move) -> UndoRecord {
        let us = self.side_to_move;
        let them = us.opposite();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();
        debug_assert_eq!(piece.color, us, "{mv:?} is not a move for {us}");

        let captured = if mv.is_en_passant() {
            Some((
                ColoredPiece::new(them, Piece::Pawn),
                en_passant_victim(to, us),
            ))
        } else if mv.is_capture() {
            self.piece_at(to).map(|victim| (victim, to))
        } else {
            None
        };

        let undo = UndoRecord {
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
        };

        if let Some((victim, square)) = captured {
            debug_assert_eq!(victim.color, them);
            self.remove(victim, square);
        }

        self.hash ^= ZOBRIST.en_passant(self.en_passant);
        self.en_passant = None;

        let mut castling = self.castling;
        castling.revoke(from, to);
        if castling != self.castling {
            self.hash ^= ZOBRIST.castling(self.castling) ^ ZOBRIST.castling(castling);
            self.castling = castling;
        }

        if mv.is_castle() {
            let rook = ColoredPiece::new(us, Piece::Rook);
            let (rook_from, rook_to) = rook_travel(to);
            self.remove(rook, rook_from);
            self.put(rook, rook_to);
        }

        self.remove(piece, from);
        let placed = match mv.promotion() {
            Some(kind) => ColoredPiece::new(us, kind),
            None => piece,
        };
        self.put(placed, to);

        if piece.piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = them;
        self.hash ^= ZOBRIST.black_to_move();

        self.refresh();

        if mv.is_double_push() {
            if let Some(target) = from.offset(us.pawn_push()) {
                if self.can_capture_en_passant(target) {
                    self.en_passant = Some(target);
                    self.hash ^= ZOBRIST.en_passant(self.en_passant);
                }
            }
        }

        debug_assert_eq!(self.validate(), Ok(()), "after {mv:?}");
        undo
    }

    /// Retracts `mv`, the most recent move made, using its undo record.
    pub fn unmake(&mut self, mv: Move, undo: UndoRecord) {
        let us = self.side_to_move.opposite();
        let from = mv.from();
        let to = mv.to();
        let piece = mv.piece();

        self.side_to_move = us;

        let placed = match mv.promotion() {
            Some(kind) => ColoredPiece::new(us, kind),
            None => piece,
        };
        self.remove(placed, to);
        self.put(piece, from);

        if mv.is_castle() {
            let rook = ColoredPiece::new(us, Piece::Rook);
            let (rook_from, rook_to) = rook_travel(to);
            self.remove(rook, rook_to);
            self.put(rook, rook_from);
        }

        if let Some((victim, square)) = undo.captured {
            self.put(victim, square);
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.hash = undo.hash;

        self.refresh();
        debug_assert_eq!(self.validate(), Ok(()), "after retracting {mv:?}");
    }

    /// Whether the side to move has a legal en passant capture onto `target`.
    pub(crate) fn can_capture_en_passant(&self, target: Square) -> bool {
        let us = self.side_to_move;
        let capturers = pawn_attacks(target, us.opposite()) & self.pieces_of(Piece::Pawn, us);
        capturers
            .into_iter()
            .any(|from| en_passant_is_legal(self, from, target))
    }
}
