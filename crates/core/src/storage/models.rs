//! Database models

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::game::GameMode;
use crate::puzzle::Puzzle;

/// A solved game, ready to be stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGame {
    pub player: String,
    pub mode: GameMode,
    pub size: usize,
    pub queens: Vec<Position>,
    pub moves: u32,
    pub time_ms: u64,
    pub puzzle_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredGame {
    pub id: i64,
    pub player: String,
    pub mode: GameMode,
    pub size: usize,
    pub queens: Vec<Position>,
    pub moves: u32,
    pub time_ms: u64,
    pub puzzle_code: Option<String>,
    pub played_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player: String,
    pub best_time_ms: u64,
    pub moves: u32,
    pub games: u32,
    pub played_at: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: String,
    pub games_solved: u32,
    pub best_time_ms: Option<u64>,
    pub avg_time_ms: Option<u64>,
    pub largest_board: Option<usize>,
    pub classic: u32,
    pub time_trial: u32,
    pub puzzle: u32,
}

impl PlayerStats {
    pub fn count_for(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::Classic => self.classic,
            GameMode::TimeTrial => self.time_trial,
            GameMode::Puzzle => self.puzzle,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleRecord {
    #[serde(flatten)]
    pub puzzle: Puzzle,
    pub plays: u32,
    pub solves: u32,
    pub created_at: u64,
}

impl PuzzleRecord {
    pub fn solve_rate(&self) -> u32 {
        if self.plays == 0 {
            0
        } else {
            ((self.solves as f64 / self.plays as f64) * 100.0) as u32
        }
    }
}
