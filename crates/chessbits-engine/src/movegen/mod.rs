//! Legal move generation.
//!
//! Moves are generated directly as legal moves from the position's
//! [`Threats`](crate::Threats): double check allows only king moves, a
//! single check restricts destinations to the checker and the squares
//! between it and the king, and pinned pieces stay on the line through
//! their king. Nothing is generated and then filtered by making the move.
//!
//! Every move is annotated with whether it gives check and whether it
//! threatens an enemy piece.

pub mod attacks;
pub(crate) mod castling;
pub mod perft;
pub mod rays;

use crate::{Bitboard, Position};
use chessbits_core::{Color, ColoredPiece, Move, MoveFlags, Piece, Square, UciMove};

use attacks::{bishop_attacks, king_attacks, pawn_attacks, piece_attacks, rook_attacks};
use rays::line;

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so we use a fixed-size
/// array to avoid heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of legal moves in any chess position.
    pub const MAX_MOVES: usize = 256;

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Move::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// The move matching coordinate text, if it is in the list.
    pub fn find(&self, uci: &UciMove) -> Option<Move> {
        self.iter().copied().find(|m| uci.matches(*m))
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the side to move.
///
/// Order: by piece kind (pawn, knight, bishop, rook, queen, king), then by
/// origin square, then by destination square; promotions from one origin to
/// one destination come as knight, bishop, rook, queen.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let generator = Generator::new(position);

    if !position.threats().in_double_check() {
        generator.pawn_moves(&mut moves);
        for kind in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            generator.piece_moves(kind, &mut moves);
        }
    }
    generator.king_moves(&mut moves);

    moves
}

/// Square of the pawn removed by an en passant capture landing on `target`.
#[inline]
pub(crate) fn en_passant_victim(target: Square, capturer: Color) -> Square {
    Square::from_index_unchecked((target.index() as i8 - capturer.pawn_push()) as u8)
}

/// Whether the side to move's pawn on `from` may capture en passant onto
/// `target`.
///
/// The capture removes two pieces from one line, so it is checked against
/// the occupancy after the move: no enemy slider may then reach the king,
/// and no enemy pawn or knight other than the captured pawn may be giving
/// check.
pub(crate) fn en_passant_is_legal(position: &Position, from: Square, target: Square) -> bool {
    let us = position.side_to_move();
    let them = us.opposite();
    let king = position.threats().king_square;
    let victim = en_passant_victim(target, us);

    let occupied = position
        .occupied()
        .without(from)
        .without(victim)
        .with(target);
    let sliders = (bishop_attacks(king, occupied) & position.diagonal_sliders(them))
        | (rook_attacks(king, occupied) & position.orthogonal_sliders(them));

    let leapers = position.pieces_of(Piece::Pawn, them) | position.pieces_of(Piece::Knight, them);
    let leaper_checkers = position.threats().checkers & leapers & !Bitboard::from_square(victim);

    sliders.is_empty() && leaper_checkers.is_empty()
}

/// Per-call generation context.
struct Generator<'a> {
    position: &'a Position,
    us: Color,
    ours: Bitboard,
    theirs: Bitboard,
    occupied: Bitboard,
    king: Square,
    /// Destinations that resolve a single check; every square otherwise.
    evasions: Bitboard,
    pinned: Bitboard,
    their_king: Square,
    our_diagonal: Bitboard,
    our_orthogonal: Bitboard,
}

impl<'a> Generator<'a> {
    fn new(position: &'a Position) -> Self {
        let us = position.side_to_move();
        let them = us.opposite();
        let threats = position.threats();
        let king = threats.king_square;

        let evasions = match threats.checker_count {
            0 => Bitboard::FULL,
            1 => threats.checkers | rays::between(king, threats.checkers.bit_scan_forward()),
            _ => Bitboard::EMPTY,
        };

        Generator {
            position,
            us,
            ours: position.occupancy(us),
            theirs: position.occupancy(them),
            occupied: position.occupied(),
            king,
            evasions,
            pinned: threats.pinned(),
            their_king: position.king_square(them),
            our_diagonal: position.diagonal_sliders(us),
            our_orthogonal: position.orthogonal_sliders(us),
        }
    }

    /// Destinations allowed for a non-king piece on `from`.
    #[inline]
    fn restriction(&self, from: Square) -> Bitboard {
        if self.pinned.get(from) {
            self.evasions & line(self.king, from)
        } else {
            self.evasions
        }
    }

    #[inline]
    fn capture_flag(&self, to: Square) -> MoveFlags {
        if self.theirs.get(to) {
            MoveFlags::CAPTURE
        } else {
            MoveFlags::NONE
        }
    }

    fn pawn_moves(&self, moves: &mut MoveList) {
        let piece = ColoredPiece::new(self.us, Piece::Pawn);
        let push = self.us.pawn_push();
        let en_passant = self.position.en_passant();

        for from in self.position.pieces(piece) {
            let mut targets = pawn_attacks(from, self.us) & self.theirs;
            if let Some(single) = from.offset(push) {
                if !self.occupied.get(single) {
                    targets.set(single);
                    if from.rank() == self.us.pawn_rank() {
                        if let Some(double) = single.offset(push) {
                            if !self.occupied.get(double) {
                                targets.set(double);
                            }
                        }
                    }
                }
            }
            targets &= self.restriction(from);

            if let Some(ep) = en_passant {
                if pawn_attacks(from, self.us).get(ep) && en_passant_is_legal(self.position, from, ep)
                {
                    targets.set(ep);
                }
            }

            for to in targets {
                let base = Move::new(from, to, piece);
                if Some(to) == en_passant {
                    moves.push(self.annotate(
                        base.with_flags(MoveFlags::CAPTURE | MoveFlags::EN_PASSANT),
                    ));
                } else if to.rank() == self.us.promotion_rank() {
                    let flagged = base.with_flags(self.capture_flag(to));
                    for kind in Piece::PROMOTIONS {
                        moves.push(self.annotate(flagged.with_promotion(kind)));
                    }
                } else {
                    let mut flags = self.capture_flag(to);
                    if to.index().abs_diff(from.index()) == 16 {
                        flags |= MoveFlags::DOUBLE_PUSH;
                    }
                    moves.push(self.annotate(base.with_flags(flags)));
                }
            }
        }
    }

    fn piece_moves(&self, kind: Piece, moves: &mut MoveList) {
        let piece = ColoredPiece::new(self.us, kind);
        for from in self.position.pieces(piece) {
            let targets =
                piece_attacks(piece, from, self.occupied) & !self.ours & self.restriction(from);
            for to in targets {
                let mv = Move::new(from, to, piece).with_flags(self.capture_flag(to));
                moves.push(self.annotate(mv));
            }
        }
    }

    fn king_moves(&self, moves: &mut MoveList) {
        let piece = ColoredPiece::new(self.us, Piece::King);
        let steps = king_attacks(self.king) & !self.ours & !self.position.threats().king_danger;
        let castles = castling::destinations(self.position);

        for to in steps | castles {
            let flags = if castles.get(to) {
                MoveFlags::CASTLE
            } else {
                self.capture_flag(to)
            };
            moves.push(self.annotate(Move::new(self.king, to, piece).with_flags(flags)));
        }
    }

    /// Adds CHECK or THREAT by replaying the move on the occupancy.
    ///
    /// Check covers direct, discovered, castling-rook, en passant and
    /// promotion checks. Threat means the moved piece attacks an enemy piece
    /// other than the king and does not give check.
    fn annotate(&self, mv: Move) -> Move {
        let from = mv.from();
        let to = mv.to();
        let kind = mv.promotion().unwrap_or(mv.kind());

        let mut occupied = self.occupied.without(from).with(to);
        let mut diagonal = self.our_diagonal.without(from);
        let mut orthogonal = self.our_orthogonal.without(from);
        let mut victims = self.theirs.without(to).without(self.their_king);

        if mv.is_en_passant() {
            let captured = en_passant_victim(to, self.us);
            occupied.clear(captured);
            victims.clear(captured);
        }
        if mv.is_castle() {
            let (rook_from, rook_to) = castling::rook_travel(to);
            occupied = occupied.without(rook_from).with(rook_to);
            orthogonal = orthogonal.without(rook_from).with(rook_to);
        }
        match kind {
            Piece::Bishop => diagonal.set(to),
            Piece::Rook => orthogonal.set(to),
            Piece::Queen => {
                diagonal.set(to);
                orthogonal.set(to);
            }
            _ => {}
        }

        let moved = piece_attacks(ColoredPiece::new(self.us, kind), to, occupied);
        let slider_check = (bishop_attacks(self.their_king, occupied) & diagonal).is_not_empty()
            || (rook_attacks(self.their_king, occupied) & orthogonal).is_not_empty();
        let leaper_check = matches!(kind, Piece::Pawn | Piece::Knight) && moved.get(self.their_king);

        if slider_check || leaper_check {
            mv.with_flags(MoveFlags::CHECK)
        } else if (moved & victims).is_not_empty() {
            mv.with_flags(MoveFlags::THREAT)
        } else {
            mv
        }
    }
}
