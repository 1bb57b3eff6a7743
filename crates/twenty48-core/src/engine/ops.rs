use log::trace;

use super::state::{Board, Direction, MAX_RANK, Rank, Score, tile_value};
use super::transform;

/// Result of compressing one row toward index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowOutcome {
    pub changed: bool,
    pub score_gained: Score,
}

/// Result of one move attempt. `board` is the original when `moved` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub score_gained: Score,
    pub moved: bool,
}

/// Slide a row left, merging equal neighbours once per pass.
///
/// A tile produced by a merge is not compared again in the same pass, so
/// `[k, k, k, 0]` becomes `[k+1, k, 0, 0]`. Two `MAX_RANK` tiles never merge.
///
/// ```
/// use twenty48_core::engine::compress_row;
/// let mut row = [0, 0, 2, 2];
/// let out = compress_row(&mut row);
/// assert_eq!(row, [3, 0, 0, 0]);
/// assert!(out.changed);
/// assert_eq!(out.score_gained, 8);
/// ```
pub fn compress_row(row: &mut [Rank]) -> RowOutcome {
    let mut packed: Vec<Rank> = row.iter().copied().filter(|&r| r != 0).collect();
    let mut score_gained: Score = 0;

    let mut i = 0;
    while i + 1 < packed.len() {
        if packed[i] == packed[i + 1] && packed[i] < MAX_RANK {
            packed[i] += 1;
            score_gained = score_gained.saturating_add(tile_value(packed[i]));
            packed.remove(i + 1);
        }
        i += 1;
    }
    packed.resize(row.len(), 0);

    let changed = packed.as_slice() != &*row;
    row.copy_from_slice(&packed);
    RowOutcome {
        changed,
        score_gained,
    }
}

/// Slide/merge the whole board in `direction`. No randomness, no spawn.
///
/// ```
/// use twenty48_core::engine::{Board, Direction, attempt_move};
/// let b = Board::from_rows(vec![vec![0, 1], vec![0, 1]]).unwrap();
/// let out = attempt_move(&b, Direction::Up);
/// assert!(out.moved);
/// assert_eq!(out.board.to_rows(), vec![vec![0, 2], vec![0, 0]]);
/// assert_eq!(out.score_gained, 4);
/// ```
pub fn attempt_move(board: &Board, direction: Direction) -> MoveOutcome {
    let mut work = transform::forward(board, direction);
    let mut moved = false;
    let mut score_gained: Score = 0;
    for r in 0..work.size() {
        let out = compress_row(work.row_mut(r));
        moved |= out.changed;
        score_gained = score_gained.saturating_add(out.score_gained);
    }

    if !moved {
        trace!("{direction} leaves the board unchanged");
        return MoveOutcome {
            board: board.clone(),
            score_gained: 0,
            moved: false,
        };
    }
    MoveOutcome {
        board: transform::inverse(&work, direction),
        score_gained,
        moved: true,
    }
}

/// True when the board is full and no row or column holds two equal
/// neighbours. Does not simulate moves.
pub fn is_game_over(board: &Board) -> bool {
    let n = board.size();
    if board.empty_cells().next().is_some() {
        return false;
    }
    for r in 0..n {
        for c in 0..n - 1 {
            if board.get(r, c) == board.get(r, c + 1) {
                return false;
            }
        }
    }
    for c in 0..n {
        for r in 0..n - 1 {
            if board.get(r, c) == board.get(r + 1, c) {
                return false;
            }
        }
    }
    true
}

/// Directions that would change the board, in [`Direction::ALL`] order.
pub fn legal_moves(board: &Board) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&d| attempt_move(board, d).moved)
        .collect()
}

/// Fraction of `goal` reached by `score`, clamped to `[0, 1]`.
pub fn goal_progress(score: Score, goal: Score) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (score as f64 / goal as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(row: &[Rank]) -> (Vec<Rank>, RowOutcome) {
        let mut v = row.to_vec();
        let out = compress_row(&mut v);
        (v, out)
    }

    fn board(rows: &[[Rank; 4]; 4]) -> Board {
        Board::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn it_compress_row() {
        assert_eq!(compress(&[0, 0, 0, 0]).0, vec![0, 0, 0, 0]);
        assert_eq!(compress(&[1, 2, 1, 2]).0, vec![1, 2, 1, 2]);
        assert_eq!(compress(&[1, 1, 2, 2]).0, vec![2, 3, 0, 0]);
        assert_eq!(compress(&[1, 0, 0, 1]).0, vec![2, 0, 0, 0]);
        assert_eq!(compress(&[1, 3, 3, 2]).0, vec![1, 4, 2, 0]);
        assert_eq!(compress(&[1, 0, 0, 2]).0, vec![1, 2, 0, 0]);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let (row, out) = compress(&[1, 1, 1, 0]);
        assert_eq!(row, vec![2, 1, 0, 0]);
        assert!(out.changed);
        assert_eq!(out.score_gained, 4);

        let (row, out) = compress(&[2, 2, 2, 2]);
        assert_eq!(row, vec![3, 3, 0, 0]);
        assert_eq!(out.score_gained, 16);
    }

    #[test]
    fn top_rank_tiles_do_not_merge() {
        let (row, out) = compress(&[63, 63, 0, 0]);
        assert_eq!(row, vec![63, 63, 0, 0]);
        assert_eq!(out, RowOutcome::default());

        let (row, out) = compress(&[0, 63, 63, 62]);
        assert_eq!(row, vec![63, 63, 62, 0]);
        assert!(out.changed);
        assert_eq!(out.score_gained, 0);

        let (row, out) = compress(&[62, 62, 63, 0]);
        assert_eq!(row, vec![63, 63, 0, 0]);
        assert_eq!(out.score_gained, 1 << 63);
    }

    #[test]
    fn top_rank_column_survives_every_direction() {
        let game = Board::from_rows(vec![vec![63, 1], vec![63, 2]]).unwrap();
        for d in [Direction::Up, Direction::Left] {
            let out = attempt_move(&game, d);
            assert!(!out.moved, "{d}");
            assert_eq!(out.board, game);
        }
        for d in Direction::ALL {
            let out = attempt_move(&game, d);
            assert!(out.board.highest_rank() <= MAX_RANK);
            let again = attempt_move(&out.board, Direction::Up);
            assert!(again.board.highest_rank() <= MAX_RANK);
        }
    }

    #[test]
    fn gap_then_pair() {
        let (row, out) = compress(&[0, 0, 2, 2]);
        assert_eq!(row, vec![3, 0, 0, 0]);
        assert!(out.changed);
        assert_eq!(out.score_gained, 8);
    }

    #[test]
    fn slide_without_merge_counts_as_change() {
        let (row, out) = compress(&[0, 1, 0, 2]);
        assert_eq!(row, vec![1, 2, 0, 0]);
        assert!(out.changed);
        assert_eq!(out.score_gained, 0);
    }

    #[test]
    fn compressed_rows_are_unchanged() {
        for row in [[0u8, 0, 0, 0], [1, 2, 1, 2], [3, 1, 0, 0], [5, 0, 0, 0]] {
            let (after, out) = compress(&row);
            assert_eq!(after, row.to_vec());
            assert_eq!(out, RowOutcome::default());
            // idempotent on its own output
            let (again, out) = compress(&after);
            assert_eq!(again, after);
            assert!(!out.changed);
        }
    }

    #[test]
    fn test_move_left() {
        let game = board(&[[1, 2, 3, 4], [1, 3, 3, 2], [2, 0, 0, 2], [1, 0, 0, 2]]);
        let out = attempt_move(&game, Direction::Left);
        assert!(out.moved);
        assert_eq!(out.score_gained, 24);
        assert_eq!(
            out.board,
            board(&[[1, 2, 3, 4], [1, 4, 2, 0], [3, 0, 0, 0], [1, 2, 0, 0]])
        );
    }

    #[test]
    fn test_move_right() {
        let game = board(&[[1, 2, 3, 4], [1, 3, 3, 2], [2, 0, 0, 2], [1, 0, 0, 2]]);
        let out = attempt_move(&game, Direction::Right);
        assert!(out.moved);
        assert_eq!(
            out.board,
            board(&[[1, 2, 3, 4], [0, 1, 4, 2], [0, 0, 0, 3], [0, 0, 1, 2]])
        );
    }

    #[test]
    fn test_move_up() {
        let game = board(&[[1, 1, 2, 1], [2, 3, 0, 0], [3, 3, 0, 0], [4, 2, 2, 2]]);
        let out = attempt_move(&game, Direction::Up);
        assert!(out.moved);
        assert_eq!(out.score_gained, 24);
        assert_eq!(
            out.board,
            board(&[[1, 1, 3, 1], [2, 4, 0, 2], [3, 2, 0, 0], [4, 0, 0, 0]])
        );
    }

    #[test]
    fn test_move_down() {
        let game = board(&[[1, 1, 2, 1], [2, 3, 0, 0], [3, 3, 0, 0], [4, 2, 2, 2]]);
        let out = attempt_move(&game, Direction::Down);
        assert!(out.moved);
        assert_eq!(
            out.board,
            board(&[[1, 0, 0, 0], [2, 1, 0, 0], [3, 4, 0, 1], [4, 2, 3, 2]])
        );
    }

    #[test]
    fn unchanged_move_returns_original() {
        let game = board(&[[1, 2, 0, 0], [3, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let out = attempt_move(&game, Direction::Left);
        assert!(!out.moved);
        assert_eq!(out.score_gained, 0);
        assert_eq!(out.board, game);
        assert!(attempt_move(&game, Direction::Up).board == game);
    }

    #[test]
    fn attempt_move_leaves_input_alone() {
        let game = board(&[[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let snapshot = game.clone();
        let out = attempt_move(&game, Direction::Left);
        assert_eq!(game, snapshot);
        assert_eq!(out.board.get(0, 0), 2);
        assert_eq!(out.score_gained, 4);
    }

    #[test]
    fn moves_never_add_tiles() {
        let game = board(&[[1, 1, 2, 0], [2, 0, 2, 3], [0, 3, 3, 3], [4, 0, 0, 4]]);
        for d in Direction::ALL {
            let out = attempt_move(&game, d);
            assert!(out.board.count_non_empty() <= game.count_non_empty());
        }
    }

    #[test]
    fn game_over_detection() {
        let stuck = board(&[[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 1]]);
        assert!(is_game_over(&stuck));
        assert!(legal_moves(&stuck).is_empty());

        let mut horizontal = stuck.clone();
        horizontal.set(0, 1, 1);
        assert!(!is_game_over(&horizontal));

        let mut vertical = stuck.clone();
        vertical.set(1, 3, 2);
        assert!(!is_game_over(&vertical));

        let mut hole = stuck.clone();
        hole.set(2, 2, 0);
        assert!(!is_game_over(&hole));
        assert!(!is_game_over(&Board::new(4)));
    }

    #[test]
    fn single_hole_without_pairs() {
        // One empty corner, no equal neighbours anywhere: sliding toward the
        // corner changes the board, sliding away from it does not.
        let game = board(&[[1, 2, 1, 2], [2, 1, 2, 1], [1, 2, 1, 2], [2, 1, 2, 0]]);
        for d in [Direction::Left, Direction::Up] {
            let out = attempt_move(&game, d);
            assert!(!out.moved, "{d}");
            assert_eq!(out.score_gained, 0);
            assert_eq!(out.board, game);
        }
        assert!(!is_game_over(&game));
        assert_eq!(legal_moves(&game), vec![Direction::Down, Direction::Right]);
    }

    #[test]
    fn goal_progress_clamps() {
        assert_eq!(goal_progress(0, 30_000), 0.0);
        assert_eq!(goal_progress(15_000, 30_000), 0.5);
        assert_eq!(goal_progress(90_000, 30_000), 1.0);
        assert_eq!(goal_progress(10, 0), 0.0);
    }
}
