//! Engine module: square board of tile ranks, the compress-left primitive,
//! and the transforms that route every direction through it.
//!
//! - `Board` owns the grid and exposes cell access and empty-cell iteration.
//! - `attempt_move` is pure: it never spawns and never touches a score.
//! - `Spawner` takes its RNG as an argument so runs can be replayed.

mod ops;
mod spawn;
pub mod state;
pub mod transform;

pub use state::{Board, DEFAULT_SIZE, Direction, EmptyCells, MAX_RANK, Rank, Score, tile_value};

pub use ops::{
    MoveOutcome, RowOutcome, attempt_move, compress_row, goal_progress, is_game_over, legal_moves,
};
pub use spawn::{DEFAULT_LOW_RANK_PROBABILITY, Spawned, Spawner};
pub use transform::{reflect_horizontal, rotate_left};

impl Board {
    /// Method form of [`attempt_move`].
    #[inline]
    pub fn attempt_move(&self, direction: Direction) -> MoveOutcome {
        ops::attempt_move(self, direction)
    }

    /// Method form of [`is_game_over`].
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }
}
