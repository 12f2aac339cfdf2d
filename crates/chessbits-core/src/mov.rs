//! Move representation and coordinate notation.

use crate::{Color, ColoredPiece, ParseError, Piece, Square};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Properties of a move, fixed at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NONE: MoveFlags = MoveFlags(0);
    /// Removes an enemy piece (including en passant).
    pub const CAPTURE: MoveFlags = MoveFlags(0b0000_0001);
    /// Pawn capture onto the en passant target.
    pub const EN_PASSANT: MoveFlags = MoveFlags(0b0000_0010);
    /// King two-square castling move; the rook moves with it.
    pub const CASTLE: MoveFlags = MoveFlags(0b0000_0100);
    /// Pawn advance of two squares from its starting rank.
    pub const DOUBLE_PUSH: MoveFlags = MoveFlags(0b0000_1000);
    /// Leaves the opponent in check.
    pub const CHECK: MoveFlags = MoveFlags(0b0001_0000);
    /// Attacks an enemy piece without giving check.
    pub const THREAT: MoveFlags = MoveFlags(0b0010_0000);

    #[inline]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | other.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for MoveFlags {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for MoveFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// A fully described move.
///
/// Packed into 32 bits:
/// - bits 0-5: from square
/// - bits 6-11: to square
/// - bits 12-14: moved piece kind
/// - bit 15: moved piece color
/// - bits 16-18: promotion kind (0 when none; pawns never promote to pawns)
/// - bits 19-26: [`MoveFlags`]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

const TO_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const COLOR_SHIFT: u32 = 15;
const PROMO_SHIFT: u32 = 16;
const FLAGS_SHIFT: u32 = 19;

impl Move {
    /// Placeholder value; never a legal move.
    pub const NULL: Move = Move(0);

    /// A quiet move of `piece` from `from` to `to`.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: ColoredPiece) -> Self {
        Move(
            from.index() as u32
                | (to.index() as u32) << TO_SHIFT
                | (piece.piece as u32) << PIECE_SHIFT
                | (piece.color as u32) << COLOR_SHIFT,
        )
    }

    /// Adds flags.
    #[inline]
    pub const fn with_flags(self, flags: MoveFlags) -> Self {
        Move(self.0 | (flags.bits() as u32) << FLAGS_SHIFT)
    }

    /// Sets the promotion kind.
    #[inline]
    pub const fn with_promotion(self, kind: Piece) -> Self {
        Move((self.0 & !(0b111 << PROMO_SHIFT)) | (kind as u32) << PROMO_SHIFT)
    }

    #[inline]
    pub const fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & 0x3F) as u8)
    }

    #[inline]
    pub const fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> TO_SHIFT) & 0x3F) as u8)
    }

    /// The moving piece kind (a pawn for promotions).
    #[inline]
    pub const fn kind(self) -> Piece {
        match Piece::from_index(((self.0 >> PIECE_SHIFT) & 0b111) as usize) {
            Some(p) => p,
            None => Piece::Pawn,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        if (self.0 >> COLOR_SHIFT) & 1 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// The moving piece with its color.
    #[inline]
    pub const fn piece(self) -> ColoredPiece {
        ColoredPiece::new(self.color(), self.kind())
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        match (self.0 >> PROMO_SHIFT) & 0b111 {
            0 => None,
            k => Piece::from_index(k as usize),
        }
    }

    #[inline]
    pub const fn flags(self) -> MoveFlags {
        MoveFlags(((self.0 >> FLAGS_SHIFT) & 0xFF) as u8)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flags().contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flags().contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        self.flags().contains(MoveFlags::CASTLE)
    }

    #[inline]
    pub const fn is_double_push(self) -> bool {
        self.flags().contains(MoveFlags::DOUBLE_PUSH)
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    #[inline]
    pub const fn gives_check(self) -> bool {
        self.flags().contains(MoveFlags::CHECK)
    }

    #[inline]
    pub const fn is_threat(self) -> bool {
        self.flags().contains(MoveFlags::THREAT)
    }

    /// Coordinate notation, e.g. "e2e4" or "e7e8q".
    pub fn to_uci(self) -> String {
        match self.promotion() {
            Some(kind) => format!("{}{}{}", self.from(), self.to(), kind.letter()),
            None => format!("{}{}", self.from(), self.to()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move({} {}{})",
            self.to_uci(),
            self.piece().fen_char(),
            if self.gives_check() { "+" } else { "" }
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uci())
    }
}

/// Coordinate move text before it is matched against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl UciMove {
    /// Returns true if `mv` has the same squares and promotion kind.
    #[inline]
    pub fn matches(&self, mv: Move) -> bool {
        mv.from() == self.from && mv.to() == self.to && mv.promotion() == self.promotion
    }
}

impl FromStr for UciMove {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::MoveText(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }
        let from: Square = s[0..2].parse().map_err(|_| err())?;
        let to: Square = s[2..4].parse().map_err(|_| err())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_letter(c) {
                Some(p) if Piece::PROMOTIONS.contains(&p) => Some(p),
                _ => return Err(err()),
            },
        };
        Ok(UciMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.letter())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn packing() {
        let pawn = ColoredPiece::new(Color::Black, Piece::Pawn);
        let m = Move::new(sq("e7"), sq("e5"), pawn).with_flags(MoveFlags::DOUBLE_PUSH);
        assert_eq!(m.from(), sq("e7"));
        assert_eq!(m.to(), sq("e5"));
        assert_eq!(m.piece(), pawn);
        assert!(m.is_double_push());
        assert!(!m.is_capture());
        assert_eq!(m.promotion(), None);
    }

    #[test]
    fn promotion_and_flags() {
        let pawn = ColoredPiece::new(Color::White, Piece::Pawn);
        let m = Move::new(sq("b7"), sq("a8"), pawn)
            .with_flags(MoveFlags::CAPTURE | MoveFlags::CHECK)
            .with_promotion(Piece::Queen);
        assert_eq!(m.promotion(), Some(Piece::Queen));
        assert_eq!(m.kind(), Piece::Pawn);
        assert!(m.is_capture() && m.gives_check());
        assert!(!m.is_threat());
        assert_eq!(m.to_uci(), "b7a8q");
        assert_eq!(format!("{:?}", m), "Move(b7a8q P+)");
    }

    #[test]
    fn uci_text() {
        let parsed: UciMove = "e7e8n".parse().unwrap();
        assert_eq!(parsed.promotion, Some(Piece::Knight));
        assert_eq!(parsed.to_string(), "e7e8n");

        let king = ColoredPiece::new(Color::White, Piece::King);
        let castle = Move::new(Square::E1, Square::G1, king).with_flags(MoveFlags::CASTLE);
        assert!("e1g1".parse::<UciMove>().unwrap().matches(castle));
        assert!(!"e1f1".parse::<UciMove>().unwrap().matches(castle));
    }

    #[test]
    fn bad_uci_text() {
        for text in ["e2", "e2e", "e2e4qq", "e7e8k", "e7e8p", "z2e4", "e2e9", "é2e4"] {
            assert!(
                matches!(text.parse::<UciMove>(), Err(ParseError::MoveText(_))),
                "{text} should be rejected"
            );
        }
    }
}
