//! Bitboard representation and bit primitives.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the
//! chess board. All arithmetic wraps at 64 bits.

use chessbits_core::Square;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

const DE_BRUIJN: u64 = 0x03f7_9d71_b4cb_0a89;

/// Maps the top six bits of `isolated_bit * DE_BRUIJN` back to the bit index.
const BIT_INDEX: [u8; 64] = {
    let mut table = [0u8; 64];
    let mut i = 0;
    while i < 64 {
        table[((1u64 << i).wrapping_mul(DE_BRUIJN) >> 58) as usize] = i as u8;
        i += 1;
    }
    table
};

/// Index of the lowest set bit. `bits` must be non-zero.
#[inline]
pub const fn bit_scan_forward(bits: u64) -> u8 {
    debug_assert!(bits != 0);
    let isolated = bits & bits.wrapping_neg();
    BIT_INDEX[(isolated.wrapping_mul(DE_BRUIJN) >> 58) as usize]
}

/// Index of the highest set bit. `bits` must be non-zero.
#[inline]
pub const fn bit_scan_reverse(bits: u64) -> u8 {
    debug_assert!(bits != 0);
    // Smear the top bit downwards, then keep only it.
    let mut smeared = bits;
    smeared |= smeared >> 1;
    smeared |= smeared >> 2;
    smeared |= smeared >> 4;
    smeared |= smeared >> 8;
    smeared |= smeared >> 16;
    smeared |= smeared >> 32;
    let isolated = smeared ^ (smeared >> 1);
    BIT_INDEX[(isolated.wrapping_mul(DE_BRUIJN) >> 58) as usize]
}

/// Number of set bits.
#[inline]
pub const fn pop_count(mut bits: u64) -> u32 {
    let mut count = 0;
    while bits != 0 {
        bits &= bits - 1;
        count += 1;
    }
    count
}

/// A set of squares.
///
/// Bit 0 = a1, bit 1 = b1, ..., bit 63 = h8.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard(0x0101_0101_0101_0101);
    pub const FILE_B: Bitboard = Bitboard(0x0202_0202_0202_0202);
    pub const FILE_G: Bitboard = Bitboard(0x4040_4040_4040_4040);
    pub const FILE_H: Bitboard = Bitboard(0x8080_8080_8080_8080);

    pub const RANK_1: Bitboard = Bitboard(0x0000_0000_0000_00FF);
    pub const RANK_8: Bitboard = Bitboard(0xFF00_0000_0000_0000);

    #[inline]
    pub const fn new(bits: u64) -> Self {
        Bitboard(bits)
    }

    #[inline]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(sq.bit())
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Returns true if two or more squares are set.
    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    #[inline]
    pub const fn pop_count(self) -> u32 {
        pop_count(self.0)
    }

    #[inline]
    pub const fn get(self, sq: Square) -> bool {
        self.0 & sq.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, sq: Square) {
        self.0 |= sq.bit();
    }

    #[inline]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !sq.bit();
    }

    /// Sets or clears `sq` depending on `on`.
    #[inline]
    pub fn update(&mut self, sq: Square, on: bool) {
        self.0 = (self.0 & !sq.bit()) | ((on as u64) << sq.index());
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Self {
        Bitboard(self.0 | sq.bit())
    }

    #[inline]
    pub const fn without(self, sq: Square) -> Self {
        Bitboard(self.0 & !sq.bit())
    }

    /// Lowest set square. The board must not be empty.
    #[inline]
    pub const fn bit_scan_forward(self) -> Square {
        Square::from_index_unchecked(bit_scan_forward(self.0))
    }

    /// Highest set square. The board must not be empty.
    #[inline]
    pub const fn bit_scan_reverse(self) -> Square {
        Square::from_index_unchecked(bit_scan_reverse(self.0))
    }

    /// Lowest set square, if any.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(self.bit_scan_forward())
        }
    }

    /// Removes and returns the lowest set square.
    #[inline]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    #[inline]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitboard({:#018x})", self.0)?;
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let mark = if (self.0 >> (rank * 8 + file)) & 1 == 1 {
                    'X'
                } else {
                    '.'
                };
                write!(f, "{} ", mark)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h")
    }
}

/// Iterator over set squares, lowest first.
pub struct BitboardIter(Bitboard);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lsb()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.0.pop_count() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIter {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, |bb, sq| bb.with(sq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn scans_agree_with_hardware() {
        for i in 0..64 {
            let single = 1u64 << i;
            assert_eq!(bit_scan_forward(single), i as u8);
            assert_eq!(bit_scan_reverse(single), i as u8);
        }
        let samples = [
            0x8000_0000_0000_0001u64,
            0x0000_1010_0000_0000,
            0x00FF_0000_0000_0000,
            0xFFFF_FFFF_FFFF_FFFF,
            0x0123_4567_89AB_CDEF,
        ];
        for bits in samples {
            assert_eq!(bit_scan_forward(bits) as u32, bits.trailing_zeros());
            assert_eq!(bit_scan_reverse(bits) as u32, 63 - bits.leading_zeros());
            assert_eq!(pop_count(bits), bits.count_ones());
        }
    }

    #[test]
    fn set_clear_update() {
        let mut bb = Bitboard::EMPTY;
        bb.set(sq("e4"));
        assert!(bb.get(sq("e4")));
        bb.update(sq("e4"), false);
        assert!(bb.is_empty());
        bb.update(sq("h8"), true);
        assert_eq!(bb, Bitboard::from_square(Square::H8));
        bb.clear(Square::H8);
        assert!(bb.is_empty());
    }

    #[test]
    fn counting() {
        assert_eq!(Bitboard::EMPTY.pop_count(), 0);
        assert_eq!(Bitboard::FULL.pop_count(), 64);
        assert_eq!(Bitboard::FILE_A.pop_count(), 8);
        assert!(!Bitboard::from_square(Square::A1).more_than_one());
        assert!(Bitboard::RANK_1.more_than_one());
    }

    #[test]
    fn iterates_in_ascending_order() {
        let file: Vec<Square> = Bitboard::FILE_A.into_iter().collect();
        assert_eq!(Bitboard::FILE_A.into_iter().len(), 8);
        assert_eq!(file.first(), Some(&Square::A1));
        assert_eq!(file.last(), Some(&Square::A8));
        assert!(file.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn pop_lsb_drains() {
        let mut pair = Bitboard::from_square(sq("g7")).with(sq("b2"));
        assert_eq!(pair.pop_lsb(), Some(sq("b2")));
        assert_eq!(pair.pop_lsb(), Some(sq("g7")));
        assert!(pair.pop_lsb().is_none());
    }

    #[test]
    fn collect_squares() {
        let bb: Bitboard = [Square::A1, Square::H8].into_iter().collect();
        assert_eq!(bb.0, 1 | 1 << 63);
    }
}
