use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{self, Board, Direction, Score, Spawned, Spawner};
use crate::error::GameError;

/// Whether the game still accepts moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Playing,
    Over,
}

/// What one accepted call to [`Game::play`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub moved: bool,
    pub score_gained: Score,
    pub spawned: Option<Spawned>,
    pub status: Status,
    /// Set only on the move that ended the game.
    pub ended: bool,
}

/// Read-only copy of the state handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub score: Score,
    pub status: Status,
}

/// Single owner of board, score and status.
///
/// Every move runs to completion (slide, score, spawn, terminal check) before
/// the next one is accepted; share a `Game` across threads only behind one
/// writer.
pub struct Game<R> {
    board: Board,
    score: Score,
    status: Status,
    spawner: Spawner,
    rng: R,
}

impl<R: Rng> Game<R> {
    /// Start a fresh game: empty board of edge `size` plus two spawned tiles.
    pub fn new(size: usize, rng: R) -> Self {
        Self::with_spawner(size, Spawner::default(), rng)
    }

    pub fn with_spawner(size: usize, spawner: Spawner, rng: R) -> Self {
        let mut game = Self {
            board: Board::new(size),
            score: 0,
            status: Status::Playing,
            spawner,
            rng,
        };
        game.reset();
        game
    }

    /// Resume from an existing board and score. The status is derived from
    /// the board.
    pub fn from_board(board: Board, score: Score, spawner: Spawner, rng: R) -> Self {
        let status = if engine::is_game_over(&board) {
            Status::Over
        } else {
            Status::Playing
        };
        Self {
            board,
            score,
            status,
            spawner,
            rng,
        }
    }

    /// Clear score and board, place two tiles, and go back to `Playing`.
    pub fn reset(&mut self) {
        self.score = 0;
        self.board = Board::new(self.board.size());
        for _ in 0..2 {
            self.spawner.spawn(&mut self.board, &mut self.rng);
        }
        self.status = Status::Playing;
        debug!("reset {n}x{n} game", n = self.board.size());
    }

    /// Resolve one move.
    ///
    /// A move that changes nothing is accepted with `moved: false`: no spawn,
    /// no score change, no terminal check. Moves after the game ended are
    /// rejected and leave the state untouched.
    pub fn play(&mut self, direction: Direction) -> Result<Turn, GameError> {
        if self.status == Status::Over {
            return Err(GameError::Over { score: self.score });
        }

        let outcome = engine::attempt_move(&self.board, direction);
        if !outcome.moved {
            return Ok(Turn {
                moved: false,
                score_gained: 0,
                spawned: None,
                status: self.status,
                ended: false,
            });
        }

        self.board = outcome.board;
        self.score = self.score.saturating_add(outcome.score_gained);
        let spawned = self.spawner.spawn(&mut self.board, &mut self.rng);
        debug!(
            "{direction}: +{} (score {}), spawned {:?}",
            outcome.score_gained, self.score, spawned
        );

        let ended = engine::is_game_over(&self.board);
        if ended {
            self.status = Status::Over;
            info!("game over, final score {}", self.score);
        }
        Ok(Turn {
            moved: true,
            score_gained: outcome.score_gained,
            spawned,
            status: self.status,
            ended,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == Status::Over
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            score: self.score,
            status: self.status,
        }
    }
}
