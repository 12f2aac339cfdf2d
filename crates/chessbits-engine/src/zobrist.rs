//! Zobrist hashing for position identification.
//!
//! A position's hash is the XOR of one key per:
//! - piece on a square (12 pieces x 64 squares)
//! - black to move
//! - castling right held (4 keys)
//! - en passant target file (8 keys)
//!
//! Every key is a single XOR, so moves update the hash incrementally.

use crate::position::CastlingRights;
use chessbits_core::{ColoredPiece, Square};

/// Zobrist hash keys, generated from a fixed seed.
pub struct ZobristKeys {
    /// Indexed `[ColoredPiece::index()][square]`.
    pieces: [[u64; 64]; ColoredPiece::COUNT],
    black_to_move: u64,
    /// Indexed by castling right bit position (K, Q, k, q).
    castling: [u64; 4],
    /// Indexed by file.
    en_passant: [u64; 8],
}

impl ZobristKeys {
    const fn new() -> Self {
        // xorshift64
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[0u64; 64]; ColoredPiece::COUNT];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < ColoredPiece::COUNT {
            let mut square = 0;
            while square < 64 {
                state = next_random(state);
                pieces[piece][square] = state;
                square += 1;
            }
            piece += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub fn piece(&self, piece: ColoredPiece, sq: Square) -> u64 {
        self.pieces[piece.index()][sq.index() as usize]
    }

    #[inline]
    pub fn black_to_move(&self) -> u64 {
        self.black_to_move
    }

    /// XOR of the keys of every right held.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for (bit, value) in self.castling.iter().enumerate() {
            if rights.bits() & (1 << bit) != 0 {
                key ^= value;
            }
        }
        key
    }

    /// Key of the en passant target's file, 0 when there is none.
    #[inline]
    pub fn en_passant(&self, target: Option<Square>) -> u64 {
        match target {
            Some(sq) => self.en_passant[sq.file().index() as usize],
            None => 0,
        }
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
mod tests {
    use super::*;
    use chessbits_core::{Color, Piece};
    use std::collections::HashSet;

    #[test]
    fn keys_are_distinct() {
        let mut seen = HashSet::new();
        for piece in ColoredPiece::ALL {
            for i in 0..64 {
                assert!(seen.insert(ZOBRIST.piece(piece, Square::from_index_unchecked(i))));
            }
        }
        assert!(seen.insert(ZOBRIST.black_to_move()));
        for key in ZOBRIST.castling.iter().chain(ZOBRIST.en_passant.iter()) {
            assert!(seen.insert(*key));
        }
        assert!(!seen.contains(&0));
    }

    #[test]
    fn castling_key_combines_rights() {
        let white = ZOBRIST.castling(CastlingRights::new(0b0011));
        let black = ZOBRIST.castling(CastlingRights::new(0b1100));
        assert_eq!(white ^ black, ZOBRIST.castling(CastlingRights::ALL));
        assert_eq!(ZOBRIST.castling(CastlingRights::NONE), 0);
    }

    #[test]
    fn en_passant_key_depends_on_file_only() {
        let e3: Square = "e3".parse().unwrap();
        let e6: Square = "e6".parse().unwrap();
        assert_eq!(ZOBRIST.en_passant(Some(e3)), ZOBRIST.en_passant(Some(e6)));
        assert_eq!(ZOBRIST.en_passant(None), 0);
        let pawn = ColoredPiece::new(Color::White, Piece::Pawn);
        assert_ne!(ZOBRIST.piece(pawn, e3), ZOBRIST.en_passant(Some(e3)));
    }
}
