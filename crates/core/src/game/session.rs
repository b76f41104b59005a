//! A board being played
//!
//! The session is what a click handler mutates: every toggle is followed
//! by a fresh conflict check, and the same solved predicate decides
//! whether the result may be recorded.

use std::collections::HashSet;

use super::types::GameMode;
use crate::board::{validate_board_size, Position};
use crate::conflicts::{find_conflicts, is_valid_solution, validate_solution};
use crate::error::{Error, Result};
use crate::puzzle::Puzzle;
use crate::solver;
use crate::storage::NewGame;

/// What a toggle did to the square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Placed,
    Removed,
}

pub struct GameSession {
    size: usize,
    mode: GameMode,
    queens: Vec<Position>,
    locked: Vec<Position>,
    puzzle_code: Option<String>,
    moves: u32,
}

impl GameSession {
    pub fn new(size: usize, mode: GameMode) -> Result<Self> {
        validate_board_size(size)?;
        Ok(Self {
            size,
            mode,
            queens: Vec::new(),
            locked: Vec::new(),
            puzzle_code: None,
            moves: 0,
        })
    }

    /// Starts a puzzle game with the puzzle's queens locked in place.
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        Self {
            size: puzzle.size,
            mode: GameMode::Puzzle,
            queens: puzzle.fixed.clone(),
            locked: puzzle.fixed.clone(),
            puzzle_code: Some(puzzle.share_code.clone()),
            moves: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn queens(&self) -> &[Position] {
        &self.queens
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn remaining(&self) -> usize {
        self.size - self.queens.len()
    }

    pub fn is_locked(&self, pos: Position) -> bool {
        self.locked.contains(&pos)
    }

    /// Places a queen on an empty square or lifts the one standing there.
    pub fn toggle(&mut self, pos: Position) -> Result<Toggle> {
        if !pos.in_bounds(self.size) {
            return Err(Error::OutOfBounds {
                pos,
                size: self.size,
            });
        }

        let outcome = match self.queens.iter().position(|q| *q == pos) {
            Some(_) if self.is_locked(pos) => return Err(Error::LockedQueen(pos)),
            Some(idx) => {
                self.queens.remove(idx);
                Toggle::Removed
            }
            None if self.queens.len() >= self.size => return Err(Error::BoardFull(self.size)),
            None => {
                self.queens.push(pos);
                Toggle::Placed
            }
        };

        self.moves += 1;
        Ok(outcome)
    }

    /// Queens to highlight as attacked.
    pub fn conflicts(&self) -> HashSet<Position> {
        find_conflicts(&self.queens)
    }

    pub fn is_solved(&self) -> bool {
        is_valid_solution(&self.queens, self.size)
    }

    /// Clears every queen the player placed.
    pub fn reset(&mut self) {
        self.queens = self.locked.clone();
        self.moves = 0;
    }

    /// A square that leads to a solution from the current board.
    ///
    /// `None` once solved, while queens attack each other, or when the
    /// current queens cannot be completed.
    pub fn hint(&self) -> Option<Position> {
        if self.is_solved() || !self.conflicts().is_empty() {
            return None;
        }
        let completion = solver::complete(self.size, &self.queens)?;
        completion.into_iter().find(|p| !self.queens.contains(p))
    }

    /// The record to store for a finished game.
    pub fn to_record(&self, player: &str, time_ms: u64) -> Result<NewGame> {
        validate_solution(&self.queens, self.size)?;
        Ok(NewGame {
            player: player.to_string(),
            mode: self.mode,
            size: self.size,
            queens: self.queens.clone(),
            moves: self.moves,
            time_ms,
            puzzle_code: self.puzzle_code.clone(),
        })
    }
}
