//! Attack sets for every piece kind.
//!
//! Leaper attacks are shifts of the origin bit with the wrapping files masked
//! off before the shift, tabulated at compile time. Slider attacks come from
//! [`super::rays`].

use crate::Bitboard;
use chessbits_core::{Color, ColoredPiece, Square};

pub use super::rays::{bishop_attacks, queen_attacks, rook_attacks};

const NOT_A: u64 = !0x0101_0101_0101_0101;
const NOT_AB: u64 = !0x0303_0303_0303_0303;
const NOT_H: u64 = !0x8080_8080_8080_8080;
const NOT_GH: u64 = !0xC0C0_C0C0_C0C0_C0C0;

const fn knight_spread(b: u64) -> u64 {
    ((b & NOT_H) << 17)
        | ((b & NOT_A) << 15)
        | ((b & NOT_GH) << 10)
        | ((b & NOT_AB) << 6)
        | ((b & NOT_H) >> 15)
        | ((b & NOT_A) >> 17)
        | ((b & NOT_GH) >> 6)
        | ((b & NOT_AB) >> 10)
}

const fn king_spread(b: u64) -> u64 {
    let row = b | ((b & NOT_H) << 1) | ((b & NOT_A) >> 1);
    (row | (row << 8) | (row >> 8)) & !b
}

const fn white_pawn_spread(b: u64) -> u64 {
    ((b & NOT_A) << 7) | ((b & NOT_H) << 9)
}

const fn black_pawn_spread(b: u64) -> u64 {
    ((b & NOT_A) >> 9) | ((b & NOT_H) >> 7)
}

const KNIGHT_ATTACKS: [Bitboard; 64] = {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = Bitboard(knight_spread(1 << sq));
        sq += 1;
    }
    table
};

const KING_ATTACKS: [Bitboard; 64] = {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        table[sq] = Bitboard(king_spread(1 << sq));
        sq += 1;
    }
    table
};

/// Indexed `[color][square]`.
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0;
    while sq < 64 {
        table[0][sq] = Bitboard(white_pawn_spread(1 << sq));
        table[1][sq] = Bitboard(black_pawn_spread(1 << sq));
        sq += 1;
    }
    table
};

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Diagonal capture squares of a `color` pawn on `sq`.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Capture squares of a whole set of `color` pawns.
#[inline]
pub fn pawn_attacks_set(pawns: Bitboard, color: Color) -> Bitboard {
    match color {
        Color::White => Bitboard(white_pawn_spread(pawns.0)),
        Color::Black => Bitboard(black_pawn_spread(pawns.0)),
    }
}

type AttackFn = fn(Square, Color, Bitboard) -> Bitboard;

fn pawn_entry(sq: Square, color: Color, _: Bitboard) -> Bitboard {
    pawn_attacks(sq, color)
}

fn knight_entry(sq: Square, _: Color, _: Bitboard) -> Bitboard {
    knight_attacks(sq)
}

fn bishop_entry(sq: Square, _: Color, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied)
}

fn rook_entry(sq: Square, _: Color, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied)
}

fn queen_entry(sq: Square, _: Color, occupied: Bitboard) -> Bitboard {
    queen_attacks(sq, occupied)
}

fn king_entry(sq: Square, _: Color, _: Bitboard) -> Bitboard {
    king_attacks(sq)
}

/// Attack functions indexed by `Piece::index()`.
const ATTACKS: [AttackFn; 6] = [
    pawn_entry,
    knight_entry,
    bishop_entry,
    rook_entry,
    queen_entry,
    king_entry,
];

/// Squares attacked by `piece` standing on `sq`.
#[inline]
pub fn piece_attacks(piece: ColoredPiece, sq: Square, occupied: Bitboard) -> Bitboard {
    ATTACKS[piece.piece.index()](sq, piece.color, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessbits_core::Piece;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn knight_counts() {
        assert_eq!(knight_attacks(sq("d4")).pop_count(), 8);
        assert_eq!(knight_attacks(Square::A1).pop_count(), 2);
        assert_eq!(knight_attacks(sq("a4")).pop_count(), 4);
        assert_eq!(knight_attacks(sq("g7")).pop_count(), 4);
        assert_eq!(knight_attacks(Square::H8).pop_count(), 2);
    }

    #[test]
    fn knight_targets_from_e4() {
        let attacks = knight_attacks(sq("e4"));
        for target in ["d6", "f6", "g5", "g3", "f2", "d2", "c3", "c5"] {
            assert!(attacks.get(sq(target)), "missing {target}");
        }
    }

    #[test]
    fn king_counts() {
        assert_eq!(king_attacks(sq("d4")).pop_count(), 8);
        assert_eq!(king_attacks(Square::A1).pop_count(), 3);
        assert_eq!(king_attacks(Square::H8).pop_count(), 3);
        assert_eq!(king_attacks(sq("a4")).pop_count(), 5);
        assert!(!king_attacks(sq("d4")).get(sq("d4")));
    }

    #[test]
    fn pawn_captures() {
        let white = pawn_attacks(sq("d4"), Color::White);
        assert_eq!(white, Bitboard::from_square(sq("c5")).with(sq("e5")));
        let black = pawn_attacks(sq("d4"), Color::Black);
        assert_eq!(black, Bitboard::from_square(sq("c3")).with(sq("e3")));
        assert_eq!(pawn_attacks(sq("a4"), Color::White), Bitboard::from_square(sq("b5")));
        assert_eq!(pawn_attacks(sq("h4"), Color::Black), Bitboard::from_square(sq("g3")));
        assert!(pawn_attacks(sq("d8"), Color::White).is_empty());
    }

    #[test]
    fn pawn_set_matches_single_squares() {
        let pawns = Bitboard(0x0000_0000_00FF_8100);
        for color in Color::ALL {
            let expected = pawns
                .into_iter()
                .fold(Bitboard::EMPTY, |acc, s| acc | pawn_attacks(s, color));
            assert_eq!(pawn_attacks_set(pawns, color), expected);
        }
    }

    #[test]
    fn dispatch_by_kind() {
        let occupied = Bitboard::from_square(sq("d6"));
        let queen = ColoredPiece::new(Color::Black, Piece::Queen);
        assert_eq!(piece_attacks(queen, sq("d4"), occupied), queen_attacks(sq("d4"), occupied));
        let pawn = ColoredPiece::new(Color::Black, Piece::Pawn);
        assert_eq!(piece_attacks(pawn, sq("d4"), occupied), pawn_attacks(sq("d4"), Color::Black));
        let knight = ColoredPiece::new(Color::White, Piece::Knight);
        assert_eq!(piece_attacks(knight, sq("b1"), occupied), knight_attacks(sq("b1")));
    }
}
