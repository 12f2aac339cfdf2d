//! Check and pin information for the side to move.

use chessbits_core::{Color, ColoredPiece, Piece, Square};

use crate::movegen::attacks::{
    bishop_attacks, knight_attacks, pawn_attacks, pawn_attacks_set, piece_attacks, rook_attacks,
};
use crate::movegen::rays::between;
use crate::{Bitboard, Position};

/// Derived attack state, recomputed whenever the position changes.
///
/// All of it is relative to the side to move ("us").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threats {
    pub side: Color,
    pub king_square: Square,
    /// Every square the opponent attacks, computed as if our king were not
    /// on the board so squares behind it along a checking line count.
    pub king_danger: Bitboard,
    /// Opposing pieces giving check.
    pub checkers: Bitboard,
    pub checker_count: u32,
    /// Pieces of each color that stand alone between an opposing slider and
    /// our king. `blockers[us]` are the pinned pieces; `blockers[them]` are
    /// candidates for a discovered check by the opponent.
    pub blockers: [Bitboard; 2],
    /// Opposing slider attacks with every blocker lifted off the board.
    /// Kept for callers inspecting a position; move generation only reads
    /// `king_danger`, `checkers` and the pins.
    pub xray_danger: Bitboard,
}

impl Threats {
    /// Placeholder before the first refresh.
    pub(crate) const NONE: Threats = Threats {
        side: Color::White,
        king_square: Square::E1,
        king_danger: Bitboard::EMPTY,
        checkers: Bitboard::EMPTY,
        checker_count: 0,
        blockers: [Bitboard::EMPTY; 2],
        xray_danger: Bitboard::EMPTY,
    };

    pub(crate) fn compute(position: &Position) -> Self {
        let us = position.side_to_move();
        let them = us.opposite();
        let king = position.king_square(us);
        let occupied = position.occupied();

        let their_pawns = position.pieces_of(Piece::Pawn, them);
        let their_diagonal = position.diagonal_sliders(them);
        let their_orthogonal = position.orthogonal_sliders(them);

        let without_king = occupied.without(king);
        let mut king_danger = pawn_attacks_set(their_pawns, them);
        for piece in Piece::ALL.into_iter().skip(1) {
            let colored = ColoredPiece::new(them, piece);
            for sq in position.pieces(colored) {
                king_danger |= piece_attacks(colored, sq, without_king);
            }
        }

        let checkers = (pawn_attacks(king, us) & their_pawns)
            | (knight_attacks(king) & position.pieces_of(Piece::Knight, them))
            | (bishop_attacks(king, occupied) & their_diagonal)
            | (rook_attacks(king, occupied) & their_orthogonal);

        // Sliders that would hit the king on an empty board.
        let snipers = (bishop_attacks(king, Bitboard::EMPTY) & their_diagonal)
            | (rook_attacks(king, Bitboard::EMPTY) & their_orthogonal);
        let mut all_blockers = Bitboard::EMPTY;
        for sniper in snipers {
            let between = between(king, sniper) & occupied;
            if between.is_not_empty() && !between.more_than_one() {
                all_blockers |= between;
            }
        }
        let mut blockers = [Bitboard::EMPTY; 2];
        blockers[us.index()] = all_blockers & position.occupancy(us);
        blockers[them.index()] = all_blockers & position.occupancy(them);

        let lifted = occupied & !all_blockers;
        let mut xray_danger = Bitboard::EMPTY;
        for sq in their_diagonal {
            xray_danger |= bishop_attacks(sq, lifted);
        }
        for sq in their_orthogonal {
            xray_danger |= rook_attacks(sq, lifted);
        }

        Threats {
            side: us,
            king_square: king,
            king_danger,
            checkers,
            checker_count: checkers.pop_count(),
            blockers,
            xray_danger,
        }
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checker_count > 0
    }

    #[inline]
    pub fn in_double_check(&self) -> bool {
        self.checker_count > 1
    }

    /// Pieces of the side to move pinned to their own king.
    #[inline]
    pub fn pinned(&self) -> Bitboard {
        self.blockers[self.side.index()]
    }

    /// Opposing pieces whose move could uncover a check. Informational,
    /// like `xray_danger`.
    #[inline]
    pub fn discovery_candidates(&self) -> Bitboard {
        self.blockers[self.side.opposite().index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn threats(fen: &str) -> Threats {
        *Position::from_fen(fen).unwrap().threats()
    }

    #[test]
    fn quiet_start() {
        let t = *Position::startpos().threats();
        assert_eq!(t.side, Color::White);
        assert_eq!(t.king_square, Square::E1);
        assert!(!t.in_check());
        assert!(t.pinned().is_empty());
        // Black pawns and knights cover rank 6 entirely.
        assert_eq!((t.king_danger & Bitboard(0xFF << 40)).pop_count(), 8);
    }

    #[test]
    fn danger_extends_behind_king() {
        let t = threats("4k3/8/8/8/4r3/8/8/4K3 w - - 0 1");
        assert_eq!(t.checker_count, 1);
        assert_eq!(t.checkers, Bitboard::from_square(sq("e4")));
        // Stepping back along the rook's line stays in check.
        assert!(t.king_danger.get(sq("e2")));
        assert!(t.king_danger.get(Square::E1));
        assert!(!t.king_danger.get(Square::D1));
    }

    #[test]
    fn double_check() {
        let t = threats("4k3/8/8/8/1b2r3/8/3N4/4K3 w - - 0 1");
        assert_eq!(t.checker_count, 1);
        let t = threats("4k3/8/8/8/1b2r3/8/8/4K3 w - - 0 1");
        assert!(t.in_double_check());
    }

    #[test]
    fn pins_and_discovery_candidates() {
        // A checking slider with nothing in between pins nothing.
        let t = threats("4k3/8/8/8/8/8/4N3/4K2r w - - 0 1");
        assert!(t.pinned().is_empty());
        assert_eq!(t.checker_count, 1);

        let t = threats("4k3/8/8/8/4r3/8/4N3/4K3 w - - 0 1");
        assert_eq!(t.pinned(), Bitboard::from_square(sq("e2")));
        assert!(t.xray_danger.get(sq("e2")));
        assert!(t.xray_danger.get(Square::E1));

        // Black pawn between the rook and our king could move away.
        let t = threats("4k3/8/8/8/4r3/4p3/8/4K3 w - - 0 1");
        assert_eq!(t.discovery_candidates(), Bitboard::from_square(sq("e3")));
        assert!(t.pinned().is_empty());

        // Two pieces on the line: neither is a blocker.
        let t = threats("4k3/8/8/8/4r3/4p3/4N3/4K3 w - - 0 1");
        assert!(t.pinned().is_empty());
        assert!(t.discovery_candidates().is_empty());
    }

    #[test]
    fn pawn_and_knight_checks() {
        let t = threats("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1");
        assert_eq!(t.checkers, Bitboard::from_square(sq("d2")));
        let t = threats("4k3/8/8/8/8/3n4/8/4K3 w - - 0 1");
        assert_eq!(t.checkers, Bitboard::from_square(sq("d3")));
        let t = threats("4k3/8/8/8/8/8/4p3/4K3 w - - 0 1");
        assert!(!t.in_check());
        assert!(t.king_danger.get(Square::D1));
        assert!(t.king_danger.get(Square::F1));
    }
}
