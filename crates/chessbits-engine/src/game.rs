//! Checked game session on top of in-place make/unmake.
//!
//! [`Game`] owns a [`Position`] and the undo stack. Every move is checked
//! against the legal move list before it is played, and each successful
//! [`Game::apply`] hands back a [`MoveToken`] that can only be spent on
//! reverting that same move while it is still the most recent one.

use chessbits_core::{Color, Move, ParseError, UciMove};
use thiserror::Error;
use tracing::{debug, trace};

use crate::make_unmake::UndoRecord;
use crate::outcome::{is_insufficient_material, DrawReason, GameResult};
use crate::{generate_moves, MoveList, Position};

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    /// There is no move to take back.
    #[error("no move to undo")]
    EmptyHistory,

    /// The token does not belong to the most recent move.
    #[error("cannot revert {token}: the most recent move is {latest}")]
    OutOfOrderRevert { token: String, latest: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Proof that a move was applied, spendable once on [`Game::revert`].
#[must_use = "a move token is needed to revert the move"]
#[derive(Debug)]
pub struct MoveToken {
    ply: usize,
    mv: Move,
    /// Hash of the position the move was played from.
    hash: u64,
}

impl MoveToken {
    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Zero-based index of the move in the game.
    pub fn ply(&self) -> usize {
        self.ply
    }
}

#[derive(Debug, Clone, Copy)]
struct HistoryEntry {
    mv: Move,
    undo: UndoRecord,
    /// Repetition flag before the move.
    repetition: bool,
}

/// A game with history tracking.
#[derive(Debug, Clone)]
pub struct Game {
    position: Position,
    history: Vec<HistoryEntry>,
    /// The current position has occurred at least three times.
    repetition: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::startpos())
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(position: Position) -> Self {
        Game {
            position,
            history: Vec::new(),
            repetition: false,
        }
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ParseError> {
        Ok(Self::from_position(Position::from_fen(fen)?))
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Gives up the session, keeping the current position.
    pub fn into_position(self) -> Position {
        self.position
    }

    pub fn legal_moves(&self) -> MoveList {
        generate_moves(&self.position)
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    /// Number of half-moves played in this session.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|entry| entry.mv)
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Plays a legal move.
    pub fn apply(&mut self, mv: Move) -> Result<MoveToken, GameError> {
        if !self.legal_moves().contains(mv) {
            trace!(mv = %mv, fen = %self.position, "rejected move");
            return Err(GameError::IllegalMove(mv.to_uci()));
        }
        Ok(self.push(mv))
    }

    /// Plays a move given in coordinate notation, e.g. "e2e4" or "e7e8q".
    pub fn apply_uci(&mut self, text: &str) -> Result<MoveToken, GameError> {
        let uci: UciMove = text.parse()?;
        match self.legal_moves().find(&uci) {
            Some(mv) => Ok(self.push(mv)),
            None => {
                trace!(mv = text, fen = %self.position, "rejected move");
                Err(GameError::IllegalMove(text.to_string()))
            }
        }
    }

    /// Takes back the move `token` was issued for. It must be the most
    /// recent move still on the board.
    pub fn revert(&mut self, token: MoveToken) -> Result<Move, GameError> {
        let Some(last) = self.history.last() else {
            return Err(GameError::EmptyHistory);
        };
        if token.ply + 1 != self.history.len() || last.mv != token.mv || last.undo.hash != token.hash
        {
            return Err(GameError::OutOfOrderRevert {
                token: token.mv.to_uci(),
                latest: last.mv.to_uci(),
            });
        }
        self.pop().ok_or(GameError::EmptyHistory)
    }

    /// Takes back the most recent move.
    pub fn undo(&mut self) -> Result<Move, GameError> {
        self.pop().ok_or(GameError::EmptyHistory)
    }

    /// True once the current position has occurred three times.
    pub fn is_repetition(&self) -> bool {
        self.repetition
    }

    /// How often the current position has occurred, counting itself.
    ///
    /// Only positions with the same side to move since the last capture or
    /// pawn move can match.
    pub fn repetition_count(&self) -> usize {
        let current = self.position.hash();
        let window = self.position.halfmove_clock() as usize;
        let plies = self.history.len();

        let mut count = 1;
        let mut back = 2;
        while back <= window && back <= plies {
            if self.history[plies - back].undo.hash == current {
                count += 1;
            }
            back += 2;
        }
        count
    }

    /// The game result, if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        if self.legal_moves().is_empty() {
            return Some(if self.is_check() {
                match self.position.side_to_move() {
                    Color::White => GameResult::BlackWins,
                    Color::Black => GameResult::WhiteWins,
                }
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }
        if self.position.halfmove_clock() >= 100 {
            return Some(GameResult::Draw(DrawReason::FiftyMoveRule));
        }
        if self.repetition {
            return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
        }
        if is_insufficient_material(&self.position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        None
    }

    pub fn is_game_over(&self) -> bool {
        self.result().is_some()
    }

    fn push(&mut self, mv: Move) -> MoveToken {
        let hash = self.position.hash();
        let undo = self.position.make(mv);
        self.history.push(HistoryEntry {
            mv,
            undo,
            repetition: self.repetition,
        });
        self.repetition = self.repetition_count() >= 3;
        debug!(mv = %mv, ply = self.history.len(), repetition = self.repetition, "applied move");
        MoveToken {
            ply: self.history.len() - 1,
            mv,
            hash,
        }
    }

    fn pop(&mut self) -> Option<Move> {
        let entry = self.history.pop()?;
        self.position.unmake(entry.mv, entry.undo);
        self.repetition = entry.repetition;
        debug!(mv = %entry.mv, ply = self.history.len(), "reverted move");
        Some(entry.mv)
    }
}
