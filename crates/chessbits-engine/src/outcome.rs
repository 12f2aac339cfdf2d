//! Game results.

use chessbits_core::Piece;

use crate::Position;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// No legal moves and not in check.
    Stalemate,
    /// Neither side can deliver mate.
    InsufficientMaterial,
    /// 100 half-moves without a pawn move or capture.
    FiftyMoveRule,
    /// The same position has occurred three times.
    ThreefoldRepetition,
}

/// Bare kings, or kings plus a single knight or bishop.
pub fn is_insufficient_material(position: &Position) -> bool {
    let mut minors = 0;
    for color in chessbits_core::Color::ALL {
        let heavy = position.pieces_of(Piece::Pawn, color)
            | position.pieces_of(Piece::Rook, color)
            | position.pieces_of(Piece::Queen, color);
        if heavy.is_not_empty() {
            return false;
        }
        minors += (position.pieces_of(Piece::Knight, color)
            | position.pieces_of(Piece::Bishop, color))
        .pop_count();
    }
    minors <= 1
}
