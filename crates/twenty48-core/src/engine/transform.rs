//! Rotations and reflections used to reduce every direction to a single
//! compress-left pass.
//!
//! | direction | before compress-left       | after compress-left        |
//! |-----------|----------------------------|----------------------------|
//! | left      | -                          | -                          |
//! | right     | reflect                    | reflect                    |
//! | up        | rotate left                | rotate left x3             |
//! | down      | rotate left, then reflect  | reflect, then rotate left x3 |

use super::state::{Board, Direction};

/// Rotate 90 degrees counter-clockwise: cell `(i, j)` lands on `(n-1-j, i)`.
///
/// ```
/// use twenty48_core::engine::{Board, rotate_left};
/// let b = Board::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// assert_eq!(rotate_left(&b).to_rows(), vec![vec![2, 4], vec![1, 3]]);
/// ```
pub fn rotate_left(board: &Board) -> Board {
    let n = board.size();
    let mut out = Board::new(n);
    for i in 0..n {
        for j in 0..n {
            out.set(n - 1 - j, i, board.get(i, j));
        }
    }
    out
}

/// Reverse every row.
pub fn reflect_horizontal(board: &Board) -> Board {
    let mut out = board.clone();
    for r in 0..out.size() {
        out.row_mut(r).reverse();
    }
    out
}

fn rotate_left_n(board: &Board, times: usize) -> Board {
    (0..times).fold(board.clone(), |b, _| rotate_left(&b))
}

/// Map `board` into the frame where `direction` becomes a left move.
pub fn forward(board: &Board, direction: Direction) -> Board {
    match direction {
        Direction::Left => board.clone(),
        Direction::Right => reflect_horizontal(board),
        Direction::Up => rotate_left(board),
        Direction::Down => reflect_horizontal(&rotate_left(board)),
    }
}

/// Undo [`forward`] for the same direction.
pub fn inverse(board: &Board, direction: Direction) -> Board {
    match direction {
        Direction::Left => board.clone(),
        Direction::Right => reflect_horizontal(board),
        Direction::Up => rotate_left_n(board, 3),
        Direction::Down => rotate_left_n(&reflect_horizontal(board), 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::MAX_RANK;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample() -> Board {
        Board::from_rows(vec![
            vec![1, 2, 3, 4],
            vec![5, 6, 7, 8],
            vec![9, 10, 11, 12],
            vec![13, 14, 15, 0],
        ])
        .unwrap()
    }

    #[test]
    fn rotate_left_maps_cells() {
        let b = sample();
        let r = rotate_left(&b);
        assert_eq!(
            r.to_rows(),
            vec![
                vec![4, 8, 12, 0],
                vec![3, 7, 11, 15],
                vec![2, 6, 10, 14],
                vec![1, 5, 9, 13],
            ]
        );
        // input untouched
        assert_eq!(b, sample());
    }

    #[test]
    fn four_rotations_are_identity() {
        let b = sample();
        assert_eq!(rotate_left_n(&b, 4), b);
        let odd = Board::from_rows(vec![vec![1, 0, 2], vec![0, 3, 0], vec![4, 0, 5]]).unwrap();
        assert_eq!(rotate_left_n(&odd, 4), odd);
    }

    #[test]
    fn reflect_reverses_rows() {
        let r = reflect_horizontal(&sample());
        assert_eq!(r.row(0), &[4, 3, 2, 1]);
        assert_eq!(r.row(3), &[0, 15, 14, 13]);
        assert_eq!(reflect_horizontal(&r), sample());
    }

    #[test]
    fn forward_then_inverse_round_trips() {
        let mut rng = StdRng::seed_from_u64(0x2048);
        let mut boards = vec![
            sample(),
            Board::from_rows(vec![vec![1, 0, 2], vec![0, 3, 0], vec![4, 0, 5]]).unwrap(),
        ];
        for _ in 0..50 {
            let n = rng.gen_range(1..=6);
            let mut b = Board::new(n);
            for r in 0..n {
                for c in 0..n {
                    b.set(r, c, rng.gen_range(0..=MAX_RANK));
                }
            }
            boards.push(b);
        }
        for b in &boards {
            for d in Direction::ALL {
                assert_eq!(&inverse(&forward(b, d), d), b, "direction {d} on {b:?}");
            }
        }
    }

    #[test]
    fn up_puts_first_column_into_a_row() {
        // Column 0 read top to bottom becomes the last row after rotating left,
        // so compress-left on that row moves tiles toward row 0.
        let f = forward(&sample(), Direction::Up);
        assert_eq!(f.row(3), &[1, 5, 9, 13]);
    }

    #[test]
    fn down_reverses_columns_into_rows() {
        let f = forward(&sample(), Direction::Down);
        assert_eq!(f.row(3), &[13, 9, 5, 1]);
    }
}
