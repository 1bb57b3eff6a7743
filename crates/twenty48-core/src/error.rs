use thiserror::Error;

use crate::engine::{Rank, Score};

/// Rejections for boards built from outside data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
    #[error("rank {rank} at ({row}, {col}) is out of range")]
    RankOutOfRange { row: usize, col: usize, rank: Rank },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown direction {0:?} (expected left/right/up/down or a/d/w/s)")]
pub struct DirectionParseError(pub String);

/// Moves the controller refuses to apply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("game is over (final score {score}); reset to play again")]
    Over { score: Score },
}
