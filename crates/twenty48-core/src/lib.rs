//! twenty48-core: a deterministic 2048-style merge engine.
//!
//! - [`engine`] holds the board, the move primitive and the spawn rule.
//! - [`game`] wraps them in a single-owner controller with score and status.
//!
//! Quick start:
//! ```
//! use twenty48_core::engine::Direction;
//! use twenty48_core::game::{Game, Status};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut game = Game::new(4, StdRng::seed_from_u64(42));
//! assert_eq!(game.board().count_non_empty(), 2);
//! let turn = game.play(Direction::Left).unwrap();
//! assert_eq!(turn.status, Status::Playing);
//! ```

pub mod engine;
pub mod error;
pub mod game;

pub use error::{BoardError, DirectionParseError, GameError};
