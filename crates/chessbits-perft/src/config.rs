//! Perft suite file loading.
//!
//! A suite is a TOML file listing positions and their known node counts:
//!
//! ```toml
//! [[positions]]
//! name = "start"
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! expected = [20, 400, 8902]
//! ```

use chessbits_core::ParseError;
use chessbits_engine::Position;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading a suite.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the suite file as valid TOML.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The suite lists no positions.
    #[error("Suite has no positions")]
    EmptySuite,
    /// A position has a FEN the engine rejects.
    #[error("Position {name:?} has an invalid FEN: {source}")]
    InvalidFen { name: String, source: ParseError },
}

/// One suite entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SuitePosition {
    pub name: String,
    pub fen: String,
    /// Node counts, `expected[i]` being perft at depth `i + 1`.
    #[serde(default)]
    pub expected: Vec<u64>,
}

impl SuitePosition {
    /// Depths to run, capped at `max_depth`, with their expected counts.
    pub fn depths(&self, max_depth: Option<u32>) -> impl Iterator<Item = (u32, u64)> + '_ {
        let limit = max_depth.map_or(usize::MAX, |d| d as usize);
        self.expected
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, &nodes)| (i as u32 + 1, nodes))
    }

    pub fn position(&self) -> Result<Position, ConfigError> {
        Position::from_fen(&self.fen).map_err(|source| ConfigError::InvalidFen {
            name: self.name.clone(),
            source,
        })
    }
}

/// A loaded perft suite.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    #[serde(default)]
    pub positions: Vec<SuitePosition>,
}

impl SuiteConfig {
    /// Loads and validates a suite file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, and the
    /// validation errors of [`SuiteConfig::from_toml`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses a suite and checks that it is non-empty and every FEN loads.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SuiteConfig = toml::from_str(content)?;
        if config.positions.is_empty() {
            return Err(ConfigError::EmptySuite);
        }
        for entry in &config.positions {
            entry.position()?;
        }
        Ok(config)
    }

    /// Default suite location, next to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("suite.toml")
    }
}
