//! Castling geometry.

use chessbits_core::{File, Piece, Square};

use super::rays::{between, rank_attacks};
use crate::{Bitboard, Position};

/// Rook origin and destination for a castling king landing on `king_to`.
pub(crate) fn rook_travel(king_to: Square) -> (Square, Square) {
    let base = king_to.index() & 56;
    if king_to.file() == File::G {
        (
            Square::from_index_unchecked(base + 7),
            Square::from_index_unchecked(base + 5),
        )
    } else {
        (
            Square::from_index_unchecked(base),
            Square::from_index_unchecked(base + 3),
        )
    }
}

/// King destinations of every legal castling move for the side to move.
///
/// A rook qualifies when it still carries a right and its rank attacks reach
/// the king, which means every square between them is empty. The king may
/// not be in check, pass through an attacked square, or land on one.
pub(super) fn destinations(position: &Position) -> Bitboard {
    let threats = position.threats();
    if threats.in_check() {
        return Bitboard::EMPTY;
    }

    let us = position.side_to_move();
    let king = threats.king_square;
    let rooks = position.pieces_of(Piece::Rook, us) & position.castling().rook_squares(us);

    let mut result = Bitboard::EMPTY;
    for rook in rooks {
        if !rank_attacks(rook, position.occupied()).get(king) {
            continue;
        }
        let delta = if rook > king { 2 } else { -2 };
        let Some(to) = king.offset(delta) else {
            continue;
        };
        let path = between(king, to).with(king).with(to);
        if (path & threats.king_danger).is_empty() {
            result.set(to);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn castles(fen: &str) -> Bitboard {
        destinations(&Position::from_fen(fen).unwrap())
    }

    #[test]
    fn rook_travel_per_corner() {
        assert_eq!(rook_travel(Square::G1), (Square::H1, Square::F1));
        assert_eq!(rook_travel(Square::C1), (Square::A1, Square::D1));
        assert_eq!(rook_travel(Square::G8), (Square::H8, Square::F8));
        assert_eq!(rook_travel(Square::C8), (Square::A8, Square::D8));
    }

    #[test]
    fn both_sides_available() {
        let both = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(both, Bitboard::from_square(Square::G1).with(Square::C1));
        let both = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert_eq!(both, Bitboard::from_square(Square::G8).with(Square::C8));
    }

    #[test]
    fn blocked_path() {
        // Knight on b1 blocks the queenside even though the king never
        // crosses it.
        let dest = castles("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1");
        assert_eq!(dest, Bitboard::from_square(Square::G1));
    }

    #[test]
    fn attacked_squares() {
        // Rook on f8 covers f1: kingside is out, queenside remains.
        let dest = castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(dest, Bitboard::from_square(Square::C1));
        // Attack on b1 does not matter, the king never visits it.
        let dest = castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(dest, Bitboard::from_square(Square::C1));
        // Attack on the destination.
        let dest = castles("2r1k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(dest.is_empty());
    }

    #[test]
    fn not_while_in_check() {
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
    }

    #[test]
    fn right_required() {
        let dest = castles("r3k2r/8/8/8/8/8/8/R3K2R w Kkq - 0 1");
        assert_eq!(dest, Bitboard::from_square(sq("g1")));
    }
}
