//! Game mode and difficulty types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Time allowed per row in a time trial
pub const TIME_TRIAL_MS_PER_QUEEN: u64 = 15_000;

/// How a game was played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Free play on an empty board
    Classic,
    /// Empty board against the clock
    TimeTrial,
    /// A shared puzzle with queens already placed
    Puzzle,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Classic, GameMode::TimeTrial, GameMode::Puzzle];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::TimeTrial => "time_trial",
            GameMode::Puzzle => "puzzle",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::TimeTrial => "Time Trial",
            GameMode::Puzzle => "Puzzle",
        }
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "time_trial" | "time-trial" | "timetrial" => Ok(GameMode::TimeTrial),
            "puzzle" => Ok(GameMode::Puzzle),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_size(n: usize) -> Self {
        match n {
            0..=6 => Difficulty::Easy,
            7..=8 => Difficulty::Medium,
            9..=12 => Difficulty::Hard,
            _ => Difficulty::Expert,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

/// Time limit for a time trial on an `n`x`n` board.
pub fn time_limit_ms(n: usize) -> u64 {
    n as u64 * TIME_TRIAL_MS_PER_QUEEN
}
