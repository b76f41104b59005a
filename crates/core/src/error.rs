//! Error types for queens-core

use thiserror::Error;

use crate::board::{Position, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::conflicts::SolutionError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Board size {0} is not supported (expected {}..={})", MIN_BOARD_SIZE, MAX_BOARD_SIZE)]
    BoardSize(usize),

    #[error("Position {pos} is outside a {size}x{size} board")]
    OutOfBounds { pos: Position, size: usize },

    #[error("Queen at {0} is part of the puzzle and cannot be removed")]
    LockedQueen(Position),

    #[error("All {0} queens are already on the board")]
    BoardFull(usize),

    #[error("Invalid solution: {0}")]
    InvalidSolution(#[from] SolutionError),

    #[error("Invalid puzzle: {0}")]
    InvalidPuzzle(String),

    #[error("Unknown game mode: {0}")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
