//! Line masks and sliding-piece attacks.
//!
//! Every line through a square is computed in closed form from the square
//! index. A slider's attacks along a line are the two half-rays from its
//! square, each truncated at the first occupied square (inclusive).

use crate::bitboard::{bit_scan_forward, bit_scan_reverse};
use crate::Bitboard;
use chessbits_core::Square;

const FILE_A: u64 = 0x0101_0101_0101_0101;
const MAIN_DIAGONAL: u64 = 0x8040_2010_0804_0201;
const MAIN_ANTI_DIAGONAL: u64 = 0x0102_0408_1020_4080;

#[inline]
const fn rank_bits(sq: u8) -> u64 {
    0xFF << (sq & 56)
}

#[inline]
const fn file_bits(sq: u8) -> u64 {
    FILE_A << (sq & 7)
}

#[inline]
const fn diagonal_bits(sq: u8) -> u64 {
    let sq = sq as i32;
    let diag = 8 * (sq & 7) - (sq & 56);
    let north = -diag & (diag >> 31);
    let south = diag & (-diag >> 31);
    (MAIN_DIAGONAL >> south) << north
}

#[inline]
const fn anti_diagonal_bits(sq: u8) -> u64 {
    let sq = sq as i32;
    let diag = 56 - 8 * (sq & 7) - (sq & 56);
    let north = -diag & (diag >> 31);
    let south = diag & (-diag >> 31);
    (MAIN_ANTI_DIAGONAL >> south) << north
}

/// The rank through `sq`, including `sq`.
#[inline]
pub const fn rank_mask(sq: Square) -> Bitboard {
    Bitboard(rank_bits(sq.index()))
}

/// The file through `sq`, including `sq`.
#[inline]
pub const fn file_mask(sq: Square) -> Bitboard {
    Bitboard(file_bits(sq.index()))
}

/// The a1-h8 direction diagonal through `sq`, including `sq`.
#[inline]
pub const fn diagonal_mask(sq: Square) -> Bitboard {
    Bitboard(diagonal_bits(sq.index()))
}

/// The a8-h1 direction diagonal through `sq`, including `sq`.
#[inline]
pub const fn anti_diagonal_mask(sq: Square) -> Bitboard {
    Bitboard(anti_diagonal_bits(sq.index()))
}

/// Squares of `line` with a higher index than `sq`.
#[inline]
const fn positive_ray(line: u64, sq: u8) -> u64 {
    line & (!1u64 << sq)
}

/// Squares of `line` with a lower index than `sq`.
#[inline]
const fn negative_ray(line: u64, sq: u8) -> u64 {
    line & ((1u64 << sq) - 1)
}

/// Attacks from `sq` along one line through it.
#[inline]
const fn line_attacks(line: u64, sq: u8, occupied: u64) -> u64 {
    let mut up = positive_ray(line, sq);
    let blockers = up & occupied;
    if blockers != 0 {
        up ^= positive_ray(line, bit_scan_forward(blockers));
    }

    let mut down = negative_ray(line, sq);
    let blockers = down & occupied;
    if blockers != 0 {
        down ^= negative_ray(line, bit_scan_reverse(blockers));
    }

    up | down
}

/// Bishop attacks from `sq` given board occupancy.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let i = sq.index();
    Bitboard(
        line_attacks(diagonal_bits(i), i, occupied.0)
            | line_attacks(anti_diagonal_bits(i), i, occupied.0),
    )
}

/// Rook attacks from `sq` given board occupancy.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let i = sq.index();
    Bitboard(line_attacks(file_bits(i), i, occupied.0) | line_attacks(rank_bits(i), i, occupied.0))
}

/// Queen attacks (bishop | rook) from `sq` given board occupancy.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Rook attacks restricted to the rank through `sq`.
#[inline]
pub(crate) fn rank_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let i = sq.index();
    Bitboard(line_attacks(rank_bits(i), i, occupied.0))
}

/// The full line (rank, file or diagonal) through both squares, including
/// both. Empty when the squares are equal or not aligned.
pub fn line(a: Square, b: Square) -> Bitboard {
    if a == b {
        return Bitboard::EMPTY;
    }
    let i = a.index();
    for mask in [
        rank_bits(i),
        file_bits(i),
        diagonal_bits(i),
        anti_diagonal_bits(i),
    ] {
        if mask & b.bit() != 0 {
            return Bitboard(mask);
        }
    }
    Bitboard::EMPTY
}

/// Squares strictly between `a` and `b` on their common line.
/// Empty when the squares are adjacent, equal or not aligned.
pub fn between(a: Square, b: Square) -> Bitboard {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    line(a, b) & Bitboard(positive_ray(!0, lo.index()) & negative_ray(!0, hi.index()))
}
