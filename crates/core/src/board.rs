//! Board coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conflicts::ConflictKind;
use crate::error::{Error, Result};

/// Smallest board the game offers (n = 2 and 3 have no solution).
pub const MIN_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 20;

/// A cell on the board, `(row, col)`.
///
/// Coordinates are signed: the conflict checker only compares relative
/// values, so bounds are enforced by callers via [`Position::checked`]
/// or [`Position::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Builds a position, rejecting coordinates outside an `n`x`n` board.
    pub fn checked(row: i32, col: i32, n: usize) -> Result<Self> {
        let pos = Self::new(row, col);
        if pos.in_bounds(n) {
            Ok(pos)
        } else {
            Err(Error::OutOfBounds { pos, size: n })
        }
    }

    #[inline]
    pub fn in_bounds(self, n: usize) -> bool {
        let n = n as i64;
        (0..n).contains(&(self.row as i64)) && (0..n).contains(&(self.col as i64))
    }

    /// How `self` and `other` attack each other, if they do.
    ///
    /// Identical positions share a row, so they are reported as `Row`.
    pub fn attacks(self, other: Position) -> Option<ConflictKind> {
        let dr = (self.row as i64 - other.row as i64).abs();
        let dc = (self.col as i64 - other.col as i64).abs();
        if dr == 0 {
            Some(ConflictKind::Row)
        } else if dc == 0 {
            Some(ConflictKind::Column)
        } else if dr == dc {
            Some(ConflictKind::Diagonal)
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

pub fn validate_board_size(n: usize) -> Result<()> {
    if (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&n) {
        Ok(())
    } else {
        Err(Error::BoardSize(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds() {
        assert!(Position::new(0, 0).in_bounds(4));
        assert!(Position::new(3, 3).in_bounds(4));
        assert!(!Position::new(4, 0).in_bounds(4));
        assert!(!Position::new(0, -1).in_bounds(4));
        assert!(!Position::new(0, 0).in_bounds(0));
    }

    #[test]
    fn test_checked_rejects_negative() {
        assert!(Position::checked(2, 1, 8).is_ok());
        match Position::checked(-1, 1, 8) {
            Err(Error::OutOfBounds { pos, size }) => {
                assert_eq!(pos, Position::new(-1, 1));
                assert_eq!(size, 8);
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_attacks() {
        let a = Position::new(2, 2);
        assert_eq!(a.attacks(Position::new(2, 7)), Some(ConflictKind::Row));
        assert_eq!(a.attacks(Position::new(6, 2)), Some(ConflictKind::Column));
        assert_eq!(a.attacks(Position::new(0, 4)), Some(ConflictKind::Diagonal));
        assert_eq!(a.attacks(Position::new(5, 5)), Some(ConflictKind::Diagonal));
        assert_eq!(a.attacks(Position::new(3, 4)), None);
        assert_eq!(a.attacks(a), Some(ConflictKind::Row));
    }

    #[test]
    fn test_attacks_far_apart_coordinates() {
        let a = Position::new(i32::MIN, 0);
        let b = Position::new(i32::MAX, 1);
        assert_eq!(a.attacks(b), None);
    }

    #[test]
    fn test_display_and_tuple() {
        let pos = Position::from((3, 5));
        assert_eq!(pos, Position::new(3, 5));
        assert_eq!(pos.to_string(), "(3, 5)");
    }

    #[test]
    fn test_board_size_range() {
        assert!(validate_board_size(4).is_ok());
        assert!(validate_board_size(20).is_ok());
        assert!(matches!(validate_board_size(3), Err(Error::BoardSize(3))));
        assert!(validate_board_size(21).is_err());
    }
}
