use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Board, Rank};

/// Probability that a spawned tile is rank 1 (a "2"); otherwise rank 2.
pub const DEFAULT_LOW_RANK_PROBABILITY: f64 = 0.9;

/// A tile placed by [`Spawner::spawn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawned {
    pub row: usize,
    pub col: usize,
    pub rank: Rank,
}

/// Places new tiles on uniformly random empty cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    low_rank_probability: f64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            low_rank_probability: DEFAULT_LOW_RANK_PROBABILITY,
        }
    }
}

impl Spawner {
    pub fn new(low_rank_probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&low_rank_probability),
            "spawn probability {low_rank_probability} outside [0, 1]"
        );
        Self {
            low_rank_probability,
        }
    }

    pub fn low_rank_probability(&self) -> f64 {
        self.low_rank_probability
    }

    /// Insert a rank 1 or rank 2 tile into a random empty cell of `board`.
    ///
    /// Returns `None`, leaving the board untouched, when no cell is empty.
    ///
    /// ```
    /// use twenty48_core::engine::{Board, Spawner};
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let mut b = Board::new(4);
    /// let placed = Spawner::default().spawn(&mut b, &mut rng).unwrap();
    /// assert_eq!(b.get(placed.row, placed.col), placed.rank);
    /// assert_eq!(b.count_empty(), 15);
    /// ```
    pub fn spawn<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) -> Option<Spawned> {
        let empties: Vec<(usize, usize)> = board.empty_cells().collect();
        if empties.is_empty() {
            return None;
        }
        let (row, col) = empties[rng.gen_range(0..empties.len())];
        let rank = if rng.gen_bool(self.low_rank_probability) {
            1
        } else {
            2
        };
        board.set(row, col, rank);
        debug!("spawned rank {rank} at ({row}, {col})");
        Some(Spawned { row, col, rank })
    }
}
