//! Piece kinds and colored pieces.

use crate::Color;
use std::fmt;

/// The six kinds of chess piece.
///
/// The discriminant order is the order moves are generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece kinds in generation order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Kinds a pawn may promote to, in ascending order.
    pub const PROMOTIONS: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

    /// Returns the index of this piece kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Piece::index`].
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Piece::Pawn),
            1 => Some(Piece::Knight),
            2 => Some(Piece::Bishop),
            3 => Some(Piece::Rook),
            4 => Some(Piece::Queen),
            5 => Some(Piece::King),
            _ => None,
        }
    }

    /// Lowercase letter used in FEN and in promotion suffixes.
    pub const fn letter(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Parses a letter of either case.
    pub const fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns true for bishops, rooks and queens.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        f.write_str(name)
    }
}

/// A piece kind together with its color.
///
/// Indexes the twelve piece bitboards of a position: white pieces occupy
/// slots 0-5 and black pieces 6-11, each in [`Piece`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColoredPiece {
    pub color: Color,
    pub piece: Piece,
}

impl ColoredPiece {
    /// Number of distinct colored pieces.
    pub const COUNT: usize = 12;

    /// All colored pieces in board-slot order.
    pub const ALL: [ColoredPiece; 12] = {
        let mut all = [ColoredPiece::new(Color::White, Piece::Pawn); 12];
        let mut i = 0;
        while i < 12 {
            let color = if i < 6 { Color::White } else { Color::Black };
            let piece = match Piece::from_index(i % 6) {
                Some(p) => p,
                None => unreachable!(),
            };
            all[i] = ColoredPiece::new(color, piece);
            i += 1;
        }
        all
    };

    /// Creates a colored piece.
    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        ColoredPiece { color, piece }
    }

    /// Board slot (0-11).
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.piece.index()
    }

    /// FEN letter: uppercase for White, lowercase for Black.
    pub const fn fen_char(self) -> char {
        let c = self.piece.letter();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN piece letter.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Piece::from_letter(c) {
            Some(piece) => Some(ColoredPiece::new(color, piece)),
            None => None,
        }
    }
}

impl fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_letters() {
        let wp = ColoredPiece::new(Color::White, Piece::Pawn);
        assert_eq!(wp.fen_char(), 'P');
        assert_eq!(
            ColoredPiece::from_fen_char('n'),
            Some(ColoredPiece::new(Color::Black, Piece::Knight))
        );
        assert_eq!(ColoredPiece::from_fen_char('x'), None);
    }

    #[test]
    fn slots_are_dense() {
        for (i, cp) in ColoredPiece::ALL.iter().enumerate() {
            assert_eq!(cp.index(), i);
        }
        assert_eq!(ColoredPiece::ALL[6].color, Color::Black);
        assert_eq!(ColoredPiece::ALL[11].piece, Piece::King);
    }

    #[test]
    fn promotion_order() {
        let indices: Vec<usize> = Piece::PROMOTIONS.iter().map(|p| p.index()).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn sliders() {
        assert!(!Piece::Knight.is_slider());
        assert!(Piece::Queen.is_slider());
        assert!(!Piece::King.is_slider());
    }
}
