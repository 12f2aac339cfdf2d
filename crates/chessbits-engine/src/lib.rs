//! Bitboard chess position engine.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit square set with bit-scan and population count
//! - [`Position`] - piece placement, castling rights, en passant target,
//!   clocks, Zobrist hash and derived [`Threats`]
//! - [`generate_moves`] - exact legal move generation with check and threat
//!   annotations
//! - [`Position::make`] / [`Position::unmake`] - incremental in-place update
//! - [`Game`] - checked session with history, repetition and outcomes
//! - [`perft`] / [`perft_divide`] - move generator validation
//!
//! # Architecture
//!
//! Each colored piece kind has its own 64-bit board. Slider attacks are
//! computed with closed-form ray masks, leaper attacks come from constant
//! tables. After every update the position recomputes which squares the
//! king may not enter, who gives check and which pieces are pinned; the
//! move generator works purely from that derived state.
//!
//! # Example
//!
//! ```
//! use chessbits_engine::{generate_moves, perft, Game, Position};
//!
//! let mut position = Position::startpos();
//! println!("Legal moves from starting position: {}", generate_moves(&position).len());
//! assert_eq!(perft(&mut position, 3), 8902);
//!
//! let mut game = Game::new();
//! let _e4 = game.apply_uci("e2e4").unwrap();
//! let _e5 = game.apply_uci("e7e5").unwrap();
//! println!("Position after 1.e4 e5: {}", game.to_fen());
//! ```

mod bitboard;
mod game;
mod make_unmake;
pub mod movegen;
mod outcome;
mod position;
mod threats;
mod zobrist;

pub use bitboard::{bit_scan_forward, bit_scan_reverse, pop_count, Bitboard, BitboardIter};
pub use game::{Game, GameError, MoveToken};
pub use make_unmake::UndoRecord;
pub use movegen::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, piece_attacks, queen_attacks,
    rook_attacks,
};
pub use movegen::perft::{perft, perft_divide, PerftReport};
pub use movegen::rays::{between, line};
pub use movegen::{generate_moves, MoveList};
pub use outcome::{is_insufficient_material, DrawReason, GameResult};
pub use position::{CastlingRights, InvariantError, Position};
pub use threats::Threats;
pub use zobrist::{ZobristKeys, ZOBRIST};
