//! Chess position representation.

use std::fmt;

use chessbits_core::{Color, ColoredPiece, Fen, File, ParseError, Piece, PlacedPiece, Square};
use thiserror::Error;

use crate::movegen::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::threats::Threats;
use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

/// Rights lost when a piece leaves or lands on each square.
const REVOKED_BY: [u8; 64] = {
    let mut table = [0u8; 64];
    table[Square::A1.index() as usize] = CastlingRights::WHITE_QUEENSIDE;
    table[Square::E1.index() as usize] =
        CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE;
    table[Square::H1.index() as usize] = CastlingRights::WHITE_KINGSIDE;
    table[Square::A8.index() as usize] = CastlingRights::BLACK_QUEENSIDE;
    table[Square::E8.index() as usize] =
        CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE;
    table[Square::H8.index() as usize] = CastlingRights::BLACK_KINGSIDE;
    table
};

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Each right with the king and rook home squares it requires.
    const SLOTS: [(u8, Square, Square); 4] = [
        (Self::WHITE_KINGSIDE, Square::E1, Square::H1),
        (Self::WHITE_QUEENSIDE, Square::E1, Square::A1),
        (Self::BLACK_KINGSIDE, Square::E8, Square::H8),
        (Self::BLACK_QUEENSIDE, Square::E8, Square::A8),
    ];

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        self.0 & flag != 0
    }

    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        self.0 & flag != 0
    }

    /// Clears every right tied to either square of a move.
    #[inline]
    pub fn revoke(&mut self, from: Square, to: Square) {
        self.0 &= !(REVOKED_BY[from.index() as usize] | REVOKED_BY[to.index() as usize]);
    }

    /// Home squares of `color`'s rooks that still carry a right.
    pub fn rook_squares(self, color: Color) -> Bitboard {
        let mut squares = Bitboard::EMPTY;
        if self.kingside(color) {
            squares.set(Square::new(File::H, color.back_rank()));
        }
        if self.queenside(color) {
            squares.set(Square::new(File::A, color.back_rank()));
        }
        squares
    }
}

/// A broken position invariant, found by [`Position::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("more than one piece on {0}")]
    Overlap(Square),

    #[error("{0} occupancy is not the union of its piece boards")]
    ColorOccupancy(Color),

    #[error("{0} officers are not its occupancy minus pawns")]
    Officers(Color),

    #[error("total occupancy is not the union of both colors")]
    Occupancy,

    #[error("{color} has {count} kings")]
    KingCount { color: Color, count: u32 },

    #[error("stored hash {stored:#018x} differs from recomputed {computed:#018x}")]
    Hash { stored: u64, computed: u64 },

    #[error("derived check and pin state is stale")]
    StaleThreats,
}

/// Complete chess position state.
///
/// The twelve piece boards are the source of truth. The color occupancies,
/// officer sets, total occupancy and [`Threats`] are derived from them by
/// [`Position::refresh`] and never edited directly.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// Indexed by `ColoredPiece::index()`.
    pub(crate) boards: [Bitboard; ColoredPiece::COUNT],
    pub(crate) by_color: [Bitboard; 2],
    /// Non-pawn pieces, kings included.
    pub(crate) officers: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) threats: Threats,
}

impl Position {
    fn with_boards(
        boards: [Bitboard; ColoredPiece::COUNT],
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Self {
        let mut position = Position {
            boards,
            by_color: [Bitboard::EMPTY; 2],
            officers: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            threats: Threats::NONE,
        };
        position.hash = position.compute_hash();
        position.refresh();
        position
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        const BACK_RANK: [u64; 6] = [0, 0x42, 0x24, 0x81, 0x08, 0x10];
        let mut boards = [Bitboard::EMPTY; ColoredPiece::COUNT];
        for piece in Piece::ALL {
            let (white, black) = match piece {
                Piece::Pawn => (0xFF00, 0x00FF_0000_0000_0000),
                _ => (BACK_RANK[piece.index()], BACK_RANK[piece.index()] << 56),
            };
            boards[ColoredPiece::new(Color::White, piece).index()] = Bitboard(white);
            boards[ColoredPiece::new(Color::Black, piece).index()] = Bitboard(black);
        }
        Self::with_boards(boards, Color::White, CastlingRights::ALL, None, 0, 1)
    }

    /// Loads a position from FEN text.
    pub fn from_fen(fen: &str) -> Result<Self, ParseError> {
        Self::from_parsed(&Fen::parse(fen)?)
    }

    /// Builds a position from a parsed FEN record.
    ///
    /// Beyond the syntax checks of [`Fen::parse`], this rejects castling
    /// rights without the king and rook on their home squares, an en passant
    /// target with no double-pushed pawn in front of it, and positions where
    /// the side not to move is in check. A plausible target is still dropped
    /// when no pawn can legally capture onto it, so the hash matches the same
    /// position reached by play.
    pub fn from_parsed(fen: &Fen) -> Result<Self, ParseError> {
        let mut boards = [Bitboard::EMPTY; ColoredPiece::COUNT];
        for placed in &fen.placement {
            boards[placed.piece.index()].set(placed.square);
        }

        let castling = CastlingRights::new(fen.castling);
        for (flag, king, rook) in CastlingRights::SLOTS {
            if castling.bits() & flag == 0 {
                continue;
            }
            let color = if flag & 0b0011 != 0 {
                Color::White
            } else {
                Color::Black
            };
            let king_home = boards[ColoredPiece::new(color, Piece::King).index()].get(king);
            let rook_home = boards[ColoredPiece::new(color, Piece::Rook).index()].get(rook);
            if !king_home || !rook_home {
                return Err(ParseError::Castling(format!(
                    "right needs the {color} king on {king} and rook on {rook}"
                )));
            }
        }

        if let Some(target) = fen.en_passant {
            let mover = fen.side_to_move.opposite();
            let pushed = target.offset(mover.pawn_push());
            let origin = target.offset(-mover.pawn_push());
            let pawn = ColoredPiece::new(mover, Piece::Pawn);
            let plausible = match (pushed, origin) {
                (Some(pushed), Some(origin)) => {
                    fen.piece_at(pushed) == Some(pawn)
                        && fen.piece_at(target).is_none()
                        && fen.piece_at(origin).is_none()
                }
                _ => false,
            };
            if !plausible {
                return Err(ParseError::EnPassant(format!(
                    "{target} does not follow a {mover} double push"
                )));
            }
        }

        let mut position = Self::with_boards(
            boards,
            fen.side_to_move,
            castling,
            fen.en_passant,
            fen.halfmove_clock,
            fen.fullmove_number,
        );

        let waiting = fen.side_to_move.opposite();
        let exposed = position.attackers(
            position.king_square(waiting),
            fen.side_to_move,
            position.occupied,
        );
        if exposed.is_not_empty() {
            return Err(ParseError::Placement(format!(
                "{waiting} is in check but it is {} to move",
                fen.side_to_move
            )));
        }

        // Same rule as after a double push: no legal capture, no target.
        if let Some(target) = position.en_passant {
            if !position.can_capture_en_passant(target) {
                position.hash ^= ZOBRIST.en_passant(position.en_passant);
                position.en_passant = None;
            }
        }

        debug_assert_eq!(position.validate(), Ok(()));
        Ok(position)
    }

    /// Snapshot as a FEN record.
    pub fn to_fen_record(&self) -> Fen {
        let mut placement = Vec::with_capacity(self.occupied.pop_count() as usize);
        for square in self.occupied {
            if let Some(piece) = self.piece_at(square) {
                placement.push(PlacedPiece { square, piece });
            }
        }
        Fen {
            placement,
            side_to_move: self.side_to_move,
            castling: self.castling.bits(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// FEN text of the position.
    pub fn to_fen(&self) -> String {
        self.to_fen_record().to_string()
    }

    /// Returns the piece on the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        if !self.occupied.get(sq) {
            return None;
        }
        ColoredPiece::ALL
            .into_iter()
            .find(|piece| self.boards[piece.index()].get(sq))
    }

    #[inline]
    pub fn pieces(&self, piece: ColoredPiece) -> Bitboard {
        self.boards[piece.index()]
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.boards[ColoredPiece::new(color, piece).index()]
    }

    /// Bishops and queens of `color`.
    #[inline]
    pub fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces_of(Piece::Bishop, color) | self.pieces_of(Piece::Queen, color)
    }

    /// Rooks and queens of `color`.
    #[inline]
    pub fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces_of(Piece::Rook, color) | self.pieces_of(Piece::Queen, color)
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    /// Non-pawn pieces of `color`, including the king.
    #[inline]
    pub fn officers(&self, color: Color) -> Bitboard {
        self.officers[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Check and pin state of the side to move.
    #[inline]
    pub fn threats(&self) -> &Threats {
        &self.threats
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.threats.checker_count > 0
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(Piece::King, color).bit_scan_forward()
    }

    /// Pieces of color `by` attacking `sq` under the given occupancy.
    pub fn attackers(&self, sq: Square, by: Color, occupied: Bitboard) -> Bitboard {
        (pawn_attacks(sq, by.opposite()) & self.pieces_of(Piece::Pawn, by))
            | (knight_attacks(sq) & self.pieces_of(Piece::Knight, by))
            | (king_attacks(sq) & self.pieces_of(Piece::King, by))
            | (bishop_attacks(sq, occupied) & self.diagonal_sliders(by))
            | (rook_attacks(sq, occupied) & self.orthogonal_sliders(by))
    }

    /// Hash recomputed from scratch.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for piece in ColoredPiece::ALL {
            for sq in self.boards[piece.index()] {
                hash ^= ZOBRIST.piece(piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move();
        }
        hash ^ ZOBRIST.castling(self.castling) ^ ZOBRIST.en_passant(self.en_passant)
    }

    /// Places a piece on an empty square, updating the hash.
    #[inline]
    pub(crate) fn put(&mut self, piece: ColoredPiece, sq: Square) {
        debug_assert!(!self.boards[piece.index()].get(sq));
        self.boards[piece.index()].set(sq);
        self.hash ^= ZOBRIST.piece(piece, sq);
    }

    /// Lifts a piece off its square, updating the hash.
    #[inline]
    pub(crate) fn remove(&mut self, piece: ColoredPiece, sq: Square) {
        debug_assert!(self.boards[piece.index()].get(sq));
        self.boards[piece.index()].clear(sq);
        self.hash ^= ZOBRIST.piece(piece, sq);
    }

    /// Recomputes every derived field from the piece boards.
    pub(crate) fn refresh(&mut self) {
        for color in Color::ALL {
            let mut all = Bitboard::EMPTY;
            for piece in Piece::ALL {
                all |= self.pieces_of(piece, color);
            }
            self.by_color[color.index()] = all;
            self.officers[color.index()] = all & !self.pieces_of(Piece::Pawn, color);
        }
        self.occupied = self.by_color[0] | self.by_color[1];
        self.threats = Threats::compute(self);
    }

    /// Checks every structural invariant of the position.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut seen = Bitboard::EMPTY;
        for board in self.boards {
            let overlap = seen & board;
            if let Some(sq) = overlap.lsb() {
                return Err(InvariantError::Overlap(sq));
            }
            seen |= board;
        }

        for color in Color::ALL {
            let union = Piece::ALL
                .into_iter()
                .fold(Bitboard::EMPTY, |acc, piece| acc | self.pieces_of(piece, color));
            if union != self.occupancy(color) {
                return Err(InvariantError::ColorOccupancy(color));
            }
            if self.officers(color) != union & !self.pieces_of(Piece::Pawn, color) {
                return Err(InvariantError::Officers(color));
            }
            let count = self.pieces_of(Piece::King, color).pop_count();
            if count != 1 {
                return Err(InvariantError::KingCount { color, count });
            }
        }

        if self.occupied != self.by_color[0] | self.by_color[1] {
            return Err(InvariantError::Occupancy);
        }

        let computed = self.compute_hash();
        if computed != self.hash {
            return Err(InvariantError::Hash {
                stored: self.hash,
                computed,
            });
        }

        if self.threats != Threats::compute(self) {
            return Err(InvariantError::StaleThreats);
        }
        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{}\")", self.to_fen())
    }
}
