//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use super::generate_moves;
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
///
/// The position is walked with make/unmake and handed back unchanged. At
/// depth 1 the legal move count is returned without playing the moves.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        let undo = position.make(m);
        nodes += perft(position, depth - 1);
        position.unmake(m, undo);
    }
    nodes
}

/// Subtree counts per root move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerftReport {
    pub depth: u32,
    /// Coordinate text and node count of every root move, sorted by text.
    pub divide: Vec<(String, u64)>,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl PerftReport {
    /// Nodes per second, or 0 when the run was too fast to time.
    pub fn nodes_per_second(&self) -> u64 {
        let micros = self.elapsed.as_micros();
        if micros == 0 {
            0
        } else {
            (u128::from(self.nodes) * 1_000_000 / micros) as u64
        }
    }
}

impl fmt::Display for PerftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (mv, count) in &self.divide {
            writeln!(f, "{mv}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Nodes searched: {}", self.nodes)?;
        write!(f, "Time: {} ms", self.elapsed.as_millis())
    }
}

/// Perft with divide - node count below each root move.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(position: &mut Position, depth: u32) -> PerftReport {
    let start = Instant::now();
    let moves = generate_moves(position);
    let mut divide = Vec::with_capacity(moves.len());

    if depth > 0 {
        for &m in &moves {
            let undo = position.make(m);
            let count = perft(position, depth - 1);
            position.unmake(m, undo);
            debug!(mv = %m, nodes = count, "divide");
            divide.push((m.to_uci(), count));
        }
    }

    divide.sort_by(|a, b| a.0.cmp(&b.0));
    let nodes = if depth == 0 {
        1
    } else {
        divide.iter().map(|(_, n)| n).sum()
    };

    PerftReport {
        depth,
        divide,
        nodes,
        elapsed: start.elapsed(),
    }
}
