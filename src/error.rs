//! Load-time error types
//!
//! A session never fails once it is running: winning and losing are
//! outcomes of `sim::tick`. Everything here is raised while loading a level
//! or settings, and the host treats it as a fatal start-up error.

use thiserror::Error;

/// Rejected level description
#[derive(Debug, Error)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,

    #[error("map is not square: row {row} has {found} tiles, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },

    #[error("map has no player spawn ('P')")]
    MissingPlayerSpawn,

    #[error("map has {count} player spawns, expected exactly one")]
    MultiplePlayerSpawns { count: usize },

    #[error("map has no flag tile ('F')")]
    MissingFlag,

    #[error("failed to read map: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("setting '{field}' is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
