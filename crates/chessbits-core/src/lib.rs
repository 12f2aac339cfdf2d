//! Core value types for the chessbits engine.
//!
//! This crate provides the plain data the engine works on:
//! - [`Color`], [`Piece`] and [`ColoredPiece`] for piece identity
//! - [`Square`], [`File`] and [`Rank`] for board coordinates
//! - [`Move`], [`MoveFlags`] and [`UciMove`] for moves and their notation
//! - [`Fen`] for parsing position descriptions, failing with [`ParseError`]

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{Fen, ParseError, PlacedPiece};
pub use mov::{Move, MoveFlags, UciMove};
pub use piece::{ColoredPiece, Piece};
pub use square::{File, Rank, Square};
