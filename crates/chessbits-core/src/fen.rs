//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, ColoredPiece, Piece, Rank, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing FEN, squares or move text.
///
/// Each FEN variant names the field that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid side to move: expected 'w' or 'b', got '{0}'")]
    SideToMove(String),

    #[error("invalid castling rights: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    FullmoveNumber(String),

    #[error("invalid square: {0}")]
    Square(String),

    #[error("invalid move text: {0}")]
    MoveText(String),
}

/// A piece standing on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPiece {
    pub square: Square,
    pub piece: ColoredPiece,
}

/// A validated position description.
///
/// `castling` uses one bit per right: `K` = 1, `Q` = 2, `k` = 4, `q` = 8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Pieces in ascending square order.
    pub placement: Vec<PlacedPiece>,
    pub side_to_move: Color,
    pub castling: u8,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

const CASTLING_LETTERS: [char; 4] = ['K', 'Q', 'k', 'q'];

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    ///
    /// The halfmove clock and fullmove number may be omitted, defaulting
    /// to 0 and 1.
    pub fn parse(fen: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(ParseError::FieldCount(fields.len()));
        }

        let placement = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ParseError::SideToMove(other.to_string())),
        };

        let castling = parse_castling(fields[2])?;
        let en_passant = parse_en_passant(fields[3], side_to_move)?;

        let halfmove_clock = match fields.get(4) {
            Some(text) => text
                .parse::<u32>()
                .map_err(|_| ParseError::HalfmoveClock(text.to_string()))?,
            None => 0,
        };
        let fullmove_number = match fields.get(5) {
            Some(text) => text
                .parse::<u32>()
                .map_err(|_| ParseError::FullmoveNumber(text.to_string()))?,
            None => 1,
        };

        Ok(Fen {
            placement,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Returns the piece on `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.placement
            .iter()
            .find(|p| p.square == sq)
            .map(|p| p.piece)
    }
}

fn parse_placement(text: &str) -> Result<Vec<PlacedPiece>, ParseError> {
    let ranks: Vec<&str> = text.split('/').collect();
    if ranks.len() != 8 {
        return Err(ParseError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut placed = Vec::with_capacity(32);
    let mut kings = [0u32; 2];

    // FEN lists rank 8 first.
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = Rank::ALL[7 - row];
        let mut file = 0u8;
        for c in rank_text.chars() {
            if let Some(run) = c.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(ParseError::Placement(format!(
                        "invalid empty-square count '{}' in rank {}",
                        c,
                        rank.to_char()
                    )));
                }
                file += run as u8;
                if file > 8 {
                    return Err(ParseError::Placement(format!(
                        "rank {} describes more than 8 squares",
                        rank.to_char()
                    )));
                }
            } else if let Some(piece) = ColoredPiece::from_fen_char(c) {
                if file >= 8 {
                    return Err(ParseError::Placement(format!(
                        "rank {} describes more than 8 squares",
                        rank.to_char()
                    )));
                }
                if piece.piece == Piece::Pawn && (rank == Rank::R1 || rank == Rank::R8) {
                    return Err(ParseError::Placement(format!(
                        "pawn on back rank {}",
                        rank.to_char()
                    )));
                }
                if piece.piece == Piece::King {
                    kings[piece.color.index()] += 1;
                }
                placed.push(PlacedPiece {
                    square: Square::from_index_unchecked(rank.index() * 8 + file),
                    piece,
                });
                file += 1;
            } else {
                return Err(ParseError::Placement(format!(
                    "invalid character '{}' in rank {}",
                    c,
                    rank.to_char()
                )));
            }
        }
        if file != 8 {
            return Err(ParseError::Placement(format!(
                "rank {} does not describe 8 squares",
                rank.to_char()
            )));
        }
    }

    for color in Color::ALL {
        if kings[color.index()] != 1 {
            return Err(ParseError::Placement(format!(
                "expected one {} king, found {}",
                color,
                kings[color.index()]
            )));
        }
    }

    placed.sort_by_key(|p| p.square);
    Ok(placed)
}

fn parse_castling(text: &str) -> Result<u8, ParseError> {
    if text == "-" {
        return Ok(0);
    }
    let mut bits = 0u8;
    for c in text.chars() {
        let Some(slot) = CASTLING_LETTERS.iter().position(|&l| l == c) else {
            return Err(ParseError::Castling(format!("invalid character '{}'", c)));
        };
        if bits & (1 << slot) != 0 {
            return Err(ParseError::Castling(format!("duplicate right '{}'", c)));
        }
        bits |= 1 << slot;
    }
    Ok(bits)
}

fn parse_en_passant(text: &str, side_to_move: Color) -> Result<Option<Square>, ParseError> {
    if text == "-" {
        return Ok(None);
    }
    let sq: Square = text
        .parse()
        .map_err(|_| ParseError::EnPassant(text.to_string()))?;
    // The target sits behind a pawn of the side that just moved.
    let expected = match side_to_move {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    };
    if sq.rank() != expected {
        return Err(ParseError::EnPassant(text.to_string()));
    }
    Ok(Some(sq))
}

impl FromStr for Fen {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fen::parse(s)
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for file in 0..8 {
                let sq = Square::from_index_unchecked(rank.index() * 8 + file);
                match self.piece_at(sq) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if *rank != Rank::R1 {
                f.write_str("/")?;
            }
        }

        write!(f, " {} ", self.side_to_move.fen_char())?;

        if self.castling == 0 {
            f.write_str("-")?;
        } else {
            for (slot, letter) in CASTLING_LETTERS.iter().enumerate() {
                if self.castling & (1 << slot) != 0 {
                    write!(f, "{}", letter)?;
                }
            }
        }

        match self.en_passant {
            Some(sq) => write!(f, " {}", sq)?,
            None => f.write_str(" -")?,
        }

        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.placement.len(), 32);
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, 0b1111);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.piece_at(Square::E1),
            Some(ColoredPiece::new(Color::White, Piece::King))
        );
    }

    #[test]
    fn roundtrip() {
        for text in [
            Fen::STARTPOS,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w Kq - 3 17",
        ] {
            assert_eq!(Fen::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn counters_are_optional() {
        let fen =
            Fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -").unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn field_errors() {
        let cases: [(&str, fn(&ParseError) -> bool); 10] = [
            ("invalid", |e| matches!(e, ParseError::FieldCount(1))),
            ("8/8/8/8/8/8/8 w - - 0 1", |e| {
                matches!(e, ParseError::Placement(_))
            }),
            ("4k3/8/8/8/8/8/8/4KX2 w - - 0 1", |e| {
                matches!(e, ParseError::Placement(_))
            }),
            ("4k4/8/8/8/8/8/8/4K3 w - - 0 1", |e| {
                matches!(e, ParseError::Placement(_))
            }),
            ("8/8/8/8/8/8/8/4K3 w - - 0 1", |e| {
                matches!(e, ParseError::Placement(_))
            }),
            ("P3k3/8/8/8/8/8/8/4K3 w - - 0 1", |e| {
                matches!(e, ParseError::Placement(_))
            }),
            ("4k3/8/8/8/8/8/8/4K3 x - - 0 1", |e| {
                matches!(e, ParseError::SideToMove(_))
            }),
            ("4k3/8/8/8/8/8/8/4K3 w KK - 0 1", |e| {
                matches!(e, ParseError::Castling(_))
            }),
            ("4k3/8/8/8/8/8/8/4K3 w - e3 0 1", |e| {
                matches!(e, ParseError::EnPassant(_))
            }),
            ("4k3/8/8/8/8/8/8/4K3 w - - x 1", |e| {
                matches!(e, ParseError::HalfmoveClock(_))
            }),
        ];
        for (text, check) in cases {
            let err = Fen::parse(text).unwrap_err();
            assert!(check(&err), "{text}: unexpected {err:?}");
        }
        assert!(matches!(
            Fen::parse("4k3/8/8/8/8/8/8/4K3 w - - 0 y"),
            Err(ParseError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn error_messages_name_the_input() {
        let err = Fen::parse("4k3/8/8/8/8/8/8/4K3 w Z - 0 1").unwrap_err();
        assert!(err.to_string().contains("'Z'"));
    }

    proptest! {
        #[test]
        fn parser_never_panics(text in "\\PC{0,80}") {
            let _ = Fen::parse(&text);
        }

        #[test]
        fn placement_noise_is_rejected_or_consistent(
            rank in "[1-8pnbrqkPNBRQKx]{1,10}",
        ) {
            let text = format!("4k3/8/8/{}/8/8/8/4K3 w - - 0 1", rank);
            if let Ok(fen) = Fen::parse(&text) {
                prop_assert_eq!(Fen::parse(&fen.to_string()), Ok(fen));
            }
        }
    }
}
