//! Shareable puzzles: a board with some queens already placed

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{validate_board_size, Position};
use crate::conflicts::{conflicting_pairs, validate_solution, SolutionError};
use crate::error::{Error, Result};
use crate::game::Difficulty;
use crate::solver;

pub const SHARE_CODE_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 64;

const GENERATE_ATTEMPTS: usize = 16;

// Excludes 0, 1, I, L and O
const SHARE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub share_code: String,
    pub name: String,
    pub size: usize,
    pub fixed: Vec<Position>,
    pub creator: Option<String>,
}

impl Puzzle {
    /// Validates a hand-made puzzle and gives it a fresh share code.
    pub fn new(
        name: &str,
        size: usize,
        mut fixed: Vec<Position>,
        creator: Option<String>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidPuzzle("name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::InvalidPuzzle(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        validate_board_size(size)?;

        if fixed.len() >= size {
            return Err(Error::InvalidPuzzle(
                "a puzzle must leave at least one queen to place".to_string(),
            ));
        }
        if let Some(pos) = fixed.iter().find(|p| !p.in_bounds(size)) {
            return Err(Error::OutOfBounds { pos: *pos, size });
        }
        if let Some(conflict) = conflicting_pairs(&fixed).first() {
            return Err(Error::InvalidPuzzle(conflict.to_string()));
        }
        if solver::complete(size, &fixed).is_none() {
            return Err(Error::InvalidPuzzle(
                "the placed queens cannot be extended to a solution".to_string(),
            ));
        }

        fixed.sort();
        Ok(Self {
            share_code: share_code(&mut rand::rng()),
            name: name.to_string(),
            size,
            fixed,
            creator,
        })
    }

    /// A random solvable puzzle with `prefilled` queens already placed.
    pub fn generate<R: Rng + ?Sized>(size: usize, prefilled: usize, rng: &mut R) -> Result<Self> {
        validate_board_size(size)?;
        if prefilled >= size {
            return Err(Error::InvalidPuzzle(format!(
                "at most {} queens can be prefilled on a {}x{} board",
                size - 1,
                size,
                size
            )));
        }

        let mut order: Vec<usize> = (0..size).collect();
        let shuffled = (0..GENERATE_ATTEMPTS).find_map(|_| {
            order.shuffle(rng);
            solver::complete_with_order(size, &[], &order)
        });
        let mut fixed = shuffled
            .or_else(|| solver::solve(size))
            .ok_or_else(|| Error::InvalidPuzzle(format!("no {}x{} solution found", size, size)))?;

        fixed.shuffle(rng);
        fixed.truncate(prefilled);
        fixed.sort();

        Ok(Self {
            share_code: share_code(rng),
            name: format!("Random {}x{}", size, size),
            size,
            fixed,
            creator: None,
        })
    }

    /// Checks a submitted board: a full solution keeping every puzzle queen.
    pub fn accepts(&self, solution: &[Position]) -> std::result::Result<(), SolutionError> {
        validate_solution(solution, self.size)?;
        match self.fixed.iter().find(|p| !solution.contains(p)) {
            Some(missing) => Err(SolutionError::MissingFixed(*missing)),
            None => Ok(()),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_size(self.size)
    }
}

pub fn share_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SHARE_CODE_LEN)
        .map(|_| SHARE_CODE_ALPHABET[rng.random_range(0..SHARE_CODE_ALPHABET.len())] as char)
        .collect()
}
