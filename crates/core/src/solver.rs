//! Backtracking N-Queens search
//!
//! Places one queen per row, tracking occupied columns and both diagonal
//! directions. Used for hints, puzzle generation and the "show solution"
//! endpoint; the verdict on a submitted board always comes from
//! [`crate::conflicts`].

use crate::board::Position;
use crate::conflicts::find_conflicts;

/// Node budget for searches that start from user-supplied queens.
///
/// A hopeless placement on a large board would otherwise be explored
/// exhaustively inside a request handler.
pub const SEARCH_LIMIT: u64 = 5_000_000;

struct Search {
    n: usize,
    cols: Vec<bool>,
    // indexed by row + col
    diag: Vec<bool>,
    // indexed by row - col + n - 1
    anti: Vec<bool>,
    // column of the queen on each row, if any
    rows: Vec<Option<usize>>,
    nodes: u64,
    limit: u64,
}

impl Search {
    fn new(n: usize, limit: u64) -> Self {
        let diagonals = (2 * n).saturating_sub(1);
        Self {
            n,
            cols: vec![false; n],
            diag: vec![false; diagonals],
            anti: vec![false; diagonals],
            rows: vec![None; n],
            nodes: 0,
            limit,
        }
    }

    fn is_free(&self, row: usize, col: usize) -> bool {
        !self.cols[col] && !self.diag[row + col] && !self.anti[row + self.n - 1 - col]
    }

    fn set(&mut self, row: usize, col: usize, occupied: bool) {
        self.cols[col] = occupied;
        self.diag[row + col] = occupied;
        self.anti[row + self.n - 1 - col] = occupied;
        self.rows[row] = if occupied { Some(col) } else { None };
    }

    /// Fills every empty row from `row` on, trying columns in `order`.
    fn fill(&mut self, row: usize, order: &[usize]) -> bool {
        if row == self.n {
            return true;
        }
        if self.rows[row].is_some() {
            return self.fill(row + 1, order);
        }
        for &col in order {
            if self.is_free(row, col) {
                self.nodes += 1;
                if self.nodes > self.limit {
                    return false;
                }
                self.set(row, col, true);
                if self.fill(row + 1, order) {
                    return true;
                }
                self.set(row, col, false);
            }
        }
        false
    }

    fn count(&mut self, row: usize) -> u64 {
        if row == self.n {
            return 1;
        }
        let mut total = 0;
        for col in 0..self.n {
            if self.is_free(row, col) {
                self.set(row, col, true);
                total += self.count(row + 1);
                self.set(row, col, false);
            }
        }
        total
    }

    fn board(&self) -> Vec<Position> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|c| Position::new(row as i32, c as i32)))
            .collect()
    }
}

/// First solution in lexicographic order, `None` when the board has none.
pub fn solve(n: usize) -> Option<Vec<Position>> {
    let order: Vec<usize> = (0..n).collect();
    search(n, &[], &order, u64::MAX)
}

/// A full solution that keeps every queen in `fixed`.
///
/// Returns `None` when the fixed queens are off the board, attack each
/// other, or cannot be extended to `n` queens within [`SEARCH_LIMIT`]
/// placements.
pub fn complete(n: usize, fixed: &[Position]) -> Option<Vec<Position>> {
    let order: Vec<usize> = (0..n).collect();
    complete_with_order(n, fixed, &order)
}

/// Like [`complete`], trying columns in the given order on every row.
///
/// Shuffling `order` yields different solutions for puzzle generation.
pub fn complete_with_order(n: usize, fixed: &[Position], order: &[usize]) -> Option<Vec<Position>> {
    search(n, fixed, order, SEARCH_LIMIT)
}

fn search(n: usize, fixed: &[Position], order: &[usize], limit: u64) -> Option<Vec<Position>> {
    if n == 0 || fixed.len() > n {
        return None;
    }
    if fixed.iter().any(|p| !p.in_bounds(n)) || !find_conflicts(fixed).is_empty() {
        return None;
    }

    let mut search = Search::new(n, limit);
    for pos in fixed {
        search.set(pos.row as usize, pos.col as usize, true);
    }

    if search.fill(0, order) {
        Some(search.board())
    } else {
        None
    }
}

/// Number of distinct solutions on an `n`x`n` board.
pub fn count_solutions(n: usize) -> u64 {
    if n == 0 {
        return 0;
    }
    Search::new(n, u64::MAX).count(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::is_valid_solution;

    #[test]
    fn test_known_counts() {
        let expected = [1, 0, 0, 2, 10, 4, 40, 92];
        for (i, &count) in expected.iter().enumerate() {
            assert_eq!(count_solutions(i + 1), count, "n = {}", i + 1);
        }
    }

    #[test]
    fn test_unsolvable_sizes() {
        assert!(solve(0).is_none());
        assert!(solve(2).is_none());
        assert!(solve(3).is_none());
    }

    #[test]
    fn test_first_four_queens_solution() {
        let board = solve(4).unwrap();
        assert_eq!(
            board,
            vec![
                Position::new(0, 1),
                Position::new(1, 3),
                Position::new(2, 0),
                Position::new(3, 2),
            ]
        );
    }

    #[test]
    fn test_large_board() {
        let board = solve(20).unwrap();
        assert!(is_valid_solution(&board, 20));
    }

    #[test]
    fn test_complete_keeps_fixed() {
        let fixed = [Position::new(0, 2), Position::new(5, 0)];
        let board = complete(8, &fixed).unwrap();
        assert!(is_valid_solution(&board, 8));
        for pos in &fixed {
            assert!(board.contains(pos));
        }
    }

    #[test]
    fn test_complete_rejects_bad_fixed() {
        // attacking each other
        assert!(complete(8, &[Position::new(0, 0), Position::new(3, 3)]).is_none());
        // off the board
        assert!(complete(4, &[Position::new(4, 0)]).is_none());
        // consistent but no 4-queens solution has a corner queen
        assert!(complete(4, &[Position::new(0, 0)]).is_none());
    }

    #[test]
    fn test_complete_with_reversed_order() {
        let order: Vec<usize> = (0..4).rev().collect();
        let board = complete_with_order(4, &[], &order).unwrap();
        assert_eq!(board[0], Position::new(0, 2));
        assert!(is_valid_solution(&board, 4));
    }
}
