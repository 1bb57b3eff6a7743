use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, DirectionParseError};

/// Tile exponent stored per cell. 0 is empty, `k > 0` displays as `2^k`.
pub type Rank = u8;
pub type Score = u64;

/// Largest rank a board may hold; `2^MAX_RANK` still fits a `Score`.
pub const MAX_RANK: Rank = 63;

/// Board edge used by the classic game.
pub const DEFAULT_SIZE: usize = 4;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            other => Err(DirectionParseError(other.to_string())),
        }
    }
}

/// Square grid of tile ranks stored row-major.
///
/// The edge length is fixed at construction. Cloning is a deep copy, so a
/// clone can be transformed and compressed without touching the original.
/// Serialized as nested rows; deserializing goes through [`Board::from_rows`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Rank>>", into = "Vec<Vec<Rank>>")]
pub struct Board {
    size: usize,
    cells: Vec<Rank>,
}

impl Board {
    /// An all-empty board with edge `size`.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// let b = Board::new(4);
    /// assert_eq!(b.count_empty(), 16);
    /// ```
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Board {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a board from explicit rows, checking shape and rank range.
    ///
    /// ```
    /// use twenty48_core::engine::Board;
    /// let b = Board::from_rows(vec![vec![1, 0], vec![0, 2]]).unwrap();
    /// assert_eq!(b.get(1, 1), 2);
    /// assert!(Board::from_rows(vec![vec![1, 0]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<Rank>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(BoardError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            if let Some(col) = values.iter().position(|&r| r > MAX_RANK) {
                return Err(BoardError::RankOutOfRange {
                    row,
                    col,
                    rank: values[col],
                });
            }
            cells.extend(values);
        }
        Ok(Board { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Rank {
        self.cells[self.index(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, rank: Rank) {
        assert!(rank <= MAX_RANK, "rank {rank} exceeds {MAX_RANK}");
        let idx = self.index(row, col);
        self.cells[idx] = rank;
    }

    /// Borrow row `row` as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[Rank] {
        assert!(row < self.size, "row {row} out of range");
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    #[inline]
    pub(crate) fn row_mut(&mut self, row: usize) -> &mut [Rank] {
        let n = self.size;
        &mut self.cells[row * n..(row + 1) * n]
    }

    /// Iterate over rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rank]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Copy the grid out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Rank>> {
        self.rows().map(<[Rank]>::to_vec).collect()
    }

    /// Lazily yield `(row, col)` of every empty cell in row-major order.
    ///
    /// The iterator borrows the board, so it has to be dropped (or collected)
    /// before the board can be mutated.
    pub fn empty_cells(&self) -> EmptyCells<'_> {
        EmptyCells {
            board: self,
            idx: 0,
        }
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&r| r == 0).count()
    }

    pub fn count_non_empty(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    pub fn highest_rank(&self) -> Rank {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) outside {n}x{n} board",
            n = self.size
        );
        row * self.size + col
    }
}

impl TryFrom<Vec<Vec<Rank>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Rank>>) -> Result<Self, Self::Error> {
        Board::from_rows(rows)
    }
}

impl From<Board> for Vec<Vec<Rank>> {
    fn from(board: Board) -> Self {
        board.to_rows()
    }
}

/// Displayed value of a rank: `2^rank`, or 0 for an empty cell.
#[inline]
pub fn tile_value(rank: Rank) -> u64 {
    if rank == 0 {
        0
    } else {
        1u64.checked_shl(u32::from(rank)).unwrap_or(u64::MAX)
    }
}

/// Iterator over empty coordinates, see [`Board::empty_cells`].
pub struct EmptyCells<'a> {
    board: &'a Board,
    idx: usize,
}

impl Iterator for EmptyCells<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.board.size;
        while self.idx < self.board.cells.len() {
            let idx = self.idx;
            self.idx += 1;
            if self.board.cells[idx] == 0 {
                return Some((idx / n, idx % n));
            }
        }
        None
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.size * 8;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{}", "-".repeat(width))?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(rank: &Rank) -> String {
    match *rank {
        0 => String::from("       "),
        r => format!("{:^7}", tile_value(r)),
    }
}
