//! Queens Core Library
//!
//! N-Queens board logic: conflict checking, the solved predicate, a
//! backtracking solver, live game sessions, shareable puzzles and SQLite
//! storage for solved games.

pub mod board;
pub mod conflicts;
pub mod error;
pub mod game;
pub mod puzzle;
pub mod solver;
pub mod storage;

pub use board::{Position, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
pub use conflicts::{
    conflicting_pairs, find_conflicts, is_valid_solution, validate_solution, Conflict, ConflictKind,
    SolutionError,
};
pub use error::{Error, Result};
pub use game::{Difficulty, GameMode, GameSession, Toggle};
pub use puzzle::Puzzle;
pub use storage::Database;
