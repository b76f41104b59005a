//! Conflict checking for queen placements
//!
//! Two queens conflict when they share a row, a column or a diagonal.
//! Everything here is a pure function of its input: the same checks back
//! the live board highlighting and the server's "solved" verdict.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::board::Position;

/// Why two queens attack each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    Row,
    Column,
    Diagonal,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::Row => "row",
            ConflictKind::Column => "column",
            ConflictKind::Diagonal => "diagonal",
        }
    }
}

/// A pair of queens that attack each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub first: Position,
    pub second: Position,
    pub kind: ConflictKind,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} and {} share a {}", self.first, self.second, self.kind.as_str())
    }
}

/// First reason a board was rejected as a solution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolutionError {
    #[error("expected {expected} queens, found {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("queen at {0} is off the board")]
    OutOfBounds(Position),

    #[error("two queens on {0}")]
    Duplicate(Position),

    #[error("{0}")]
    Conflict(Conflict),

    #[error("puzzle queen at {0} is missing")]
    MissingFixed(Position),
}

/// Returns every position that takes part in at least one conflicting pair.
///
/// Coordinates are only compared with each other, so out-of-range or
/// negative values are accepted as-is. Duplicated positions conflict.
pub fn find_conflicts(placements: &[Position]) -> HashSet<Position> {
    let mut conflicting = HashSet::new();

    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if a.attacks(*b).is_some() {
                conflicting.insert(*a);
                conflicting.insert(*b);
            }
        }
    }

    conflicting
}

/// All conflicting pairs, in input order.
pub fn conflicting_pairs(placements: &[Position]) -> Vec<Conflict> {
    let mut pairs = Vec::new();

    for (i, a) in placements.iter().enumerate() {
        for b in &placements[i + 1..] {
            if let Some(kind) = a.attacks(*b) {
                pairs.push(Conflict {
                    first: *a,
                    second: *b,
                    kind,
                });
            }
        }
    }

    pairs
}

/// Checks that `placements` solves the `n`-queens puzzle.
pub fn validate_solution(placements: &[Position], n: usize) -> Result<(), SolutionError> {
    if placements.len() != n {
        return Err(SolutionError::WrongCount {
            expected: n,
            found: placements.len(),
        });
    }

    let mut seen = HashSet::with_capacity(n);
    for pos in placements {
        if !pos.in_bounds(n) {
            return Err(SolutionError::OutOfBounds(*pos));
        }
        if !seen.insert(*pos) {
            return Err(SolutionError::Duplicate(*pos));
        }
    }

    match conflicting_pairs(placements).into_iter().next() {
        Some(conflict) => Err(SolutionError::Conflict(conflict)),
        None => Ok(()),
    }
}

/// The "puzzle solved" predicate.
pub fn is_valid_solution(placements: &[Position], n: usize) -> bool {
    validate_solution(placements, n).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver;
    use proptest::prelude::*;

    fn positions(cells: &[(i32, i32)]) -> Vec<Position> {
        cells.iter().map(|&c| Position::from(c)).collect()
    }

    fn set(cells: &[(i32, i32)]) -> HashSet<Position> {
        positions(cells).into_iter().collect()
    }

    #[test]
    fn test_empty_and_single() {
        assert!(find_conflicts(&[]).is_empty());
        assert!(find_conflicts(&[Position::new(3, 3)]).is_empty());
    }

    #[test]
    fn test_four_queens_solution() {
        let board = positions(&[(0, 1), (1, 3), (2, 0), (3, 2)]);
        assert!(find_conflicts(&board).is_empty());
        assert!(is_valid_solution(&board, 4));
    }

    #[test]
    fn test_main_diagonal_all_conflict() {
        let board = positions(&[(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(find_conflicts(&board), set(&[(0, 0), (1, 1), (2, 2), (3, 3)]));
        assert!(!is_valid_solution(&board, 4));
    }

    #[test]
    fn test_same_row_on_eight_board() {
        let board = positions(&[(0, 0), (0, 1)]);
        assert_eq!(find_conflicts(&board), set(&[(0, 0), (0, 1)]));
        assert!(!is_valid_solution(&board, 8));
        assert_eq!(
            validate_solution(&board, 8),
            Err(SolutionError::WrongCount { expected: 8, found: 2 })
        );
    }

    #[test]
    fn test_only_attackers_are_reported() {
        // (0,0)-(2,2) share a diagonal; (1,4) is safe from both
        let board = positions(&[(0, 0), (1, 4), (2, 2)]);
        assert_eq!(find_conflicts(&board), set(&[(0, 0), (2, 2)]));
    }

    #[test]
    fn test_duplicates_conflict() {
        let board = positions(&[(1, 2), (1, 2)]);
        assert_eq!(find_conflicts(&board), set(&[(1, 2)]));

        let board = positions(&[(0, 1), (1, 3), (1, 3), (3, 2)]);
        assert_eq!(
            validate_solution(&board, 4),
            Err(SolutionError::Duplicate(Position::new(1, 3)))
        );
    }

    #[test]
    fn test_out_of_range_is_compared_not_rejected() {
        let board = positions(&[(-1, -1), (5, 5)]);
        assert_eq!(find_conflicts(&board).len(), 2);

        // Same relative layout as a 4-queens solution, shifted off the board
        let shifted = positions(&[(10, 11), (11, 13), (12, 10), (13, 12)]);
        assert!(find_conflicts(&shifted).is_empty());
        assert_eq!(
            validate_solution(&shifted, 4),
            Err(SolutionError::OutOfBounds(Position::new(10, 11)))
        );
    }

    #[test]
    fn test_conflicting_pairs_kinds() {
        let board = positions(&[(0, 0), (0, 5), (4, 0), (3, 3)]);
        let pairs = conflicting_pairs(&board);
        let kinds: Vec<_> = pairs.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![ConflictKind::Row, ConflictKind::Column, ConflictKind::Diagonal]
        );
        assert_eq!(pairs[2].first, Position::new(0, 0));
        assert_eq!(pairs[2].second, Position::new(3, 3));
    }

    #[test]
    fn test_validate_reports_conflict() {
        let board = positions(&[(0, 1), (1, 3), (2, 0), (3, 3)]);
        match validate_solution(&board, 4) {
            Err(SolutionError::Conflict(c)) => {
                assert_eq!(c.kind, ConflictKind::Column);
                assert_eq!(c.to_string(), "(1, 3) and (3, 3) share a column");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn test_solver_solutions_are_valid() {
        for n in [1, 4, 5, 6, 7, 8, 10, 12] {
            let board = solver::solve(n).unwrap();
            assert!(is_valid_solution(&board, n), "n = {}", n);
        }
    }

    #[test]
    fn test_idempotent() {
        let board = positions(&[(0, 0), (1, 2), (2, 4), (3, 1), (4, 3), (2, 2)]);
        assert_eq!(find_conflicts(&board), find_conflicts(&board));
    }

    fn cell() -> impl Strategy<Value = Position> {
        (0..8i32, 0..8i32).prop_map(|(row, col)| Position::new(row, col))
    }

    proptest! {
        #[test]
        fn prop_order_independent(board in proptest::collection::vec(cell(), 0..10)) {
            let mut reversed = board.clone();
            reversed.reverse();
            let mut sorted = board.clone();
            sorted.sort();
            let expected = find_conflicts(&board);
            prop_assert_eq!(&find_conflicts(&reversed), &expected);
            prop_assert_eq!(&find_conflicts(&sorted), &expected);
        }

        #[test]
        fn prop_same_row_conflicts(
            board in proptest::collection::vec(cell(), 0..6),
            row in 0..8i32,
            a in 0..8i32,
            b in 0..8i32,
        ) {
            prop_assume!(a != b);
            let (p1, p2) = (Position::new(row, a), Position::new(row, b));
            let mut board = board;
            board.push(p1);
            board.push(p2);
            let found = find_conflicts(&board);
            prop_assert!(found.contains(&p1) && found.contains(&p2));
        }

        #[test]
        fn prop_same_column_conflicts(
            board in proptest::collection::vec(cell(), 0..6),
            col in 0..8i32,
            a in 0..8i32,
            b in 0..8i32,
        ) {
            prop_assume!(a != b);
            let (p1, p2) = (Position::new(a, col), Position::new(b, col));
            let mut board = board;
            board.insert(0, p1);
            board.push(p2);
            let found = find_conflicts(&board);
            prop_assert!(found.contains(&p1) && found.contains(&p2));
        }

        #[test]
        fn prop_diagonal_conflicts(
            p1 in cell(),
            d in 1..8i32,
            anti in any::<bool>(),
        ) {
            let p2 = if anti {
                Position::new(p1.row + d, p1.col - d)
            } else {
                Position::new(p1.row - d, p1.col - d)
            };
            let found = find_conflicts(&[p2, p1]);
            prop_assert!(found.contains(&p1) && found.contains(&p2));
        }

        #[test]
        fn prop_valid_iff_checked_pieces(board in proptest::collection::vec(cell(), 8)) {
            let valid = is_valid_solution(&board, 8);
            let distinct: HashSet<_> = board.iter().collect();
            prop_assert_eq!(valid, distinct.len() == 8 && find_conflicts(&board).is_empty());
        }
    }
}
