//! Database operations

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::models::*;
use crate::conflicts::validate_solution;
use crate::error::Result;
use crate::game::GameMode;
use crate::puzzle::Puzzle;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player TEXT NOT NULL,
                mode TEXT NOT NULL,
                size INTEGER NOT NULL,
                queens TEXT NOT NULL,
                moves INTEGER NOT NULL,
                time_ms INTEGER NOT NULL,
                puzzle_code TEXT,
                played_at INTEGER NOT NULL,
                FOREIGN KEY (puzzle_code) REFERENCES puzzles(share_code)
            );

            CREATE TABLE IF NOT EXISTS puzzles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                share_code TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                size INTEGER NOT NULL,
                fixed TEXT NOT NULL,
                creator TEXT,
                plays INTEGER NOT NULL DEFAULT 0,
                solves INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_games_board ON games(size, mode, time_ms);
            CREATE INDEX IF NOT EXISTS idx_games_player ON games(player);
            CREATE INDEX IF NOT EXISTS idx_games_played_at ON games(played_at);
            CREATE INDEX IF NOT EXISTS idx_puzzles_created_at ON puzzles(created_at);
            "#,
        )?;
        Ok(())
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Stores a solved game.
    ///
    /// The board is checked again here: an unsolved board never reaches
    /// the `games` table, whichever caller sent it.
    pub fn insert_game(&self, game: &NewGame) -> Result<i64> {
        validate_solution(&game.queens, game.size)?;
        let queens = serde_json::to_string(&game.queens)?;

        self.conn.execute(
            r#"
            INSERT INTO games
            (player, mode, size, queens, moves, time_ms, puzzle_code, played_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                game.player,
                game.mode.as_str(),
                game.size,
                queens,
                game.moves,
                game.time_ms,
                game.puzzle_code,
                Self::now(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_game(&self, id: i64) -> Result<Option<StoredGame>> {
        let game = self
            .conn
            .query_row(
                "SELECT id, player, mode, size, queens, moves, time_ms, puzzle_code, played_at
                 FROM games WHERE id = ?1",
                params![id],
                game_from_row,
            )
            .optional()?;

        Ok(game)
    }

    pub fn get_recent_games(&self, limit: u32) -> Result<Vec<StoredGame>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, player, mode, size, queens, moves, time_ms, puzzle_code, played_at
             FROM games ORDER BY played_at DESC, id DESC LIMIT ?1",
        )?;

        let games = stmt
            .query_map(params![limit], game_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(games)
    }

    pub fn count_games(&self) -> Result<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Best game per player on one board size and mode.
    ///
    /// Ranked by time, then fewer moves, then who got there first.
    pub fn leaderboard(&self, size: usize, mode: GameMode, limit: u32) -> Result<Vec<LeaderboardEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player, time_ms, moves, games, played_at FROM (
                SELECT player, time_ms, moves, played_at,
                    COUNT(*) OVER (PARTITION BY player) AS games,
                    ROW_NUMBER() OVER (
                        PARTITION BY player
                        ORDER BY time_ms ASC, moves ASC, played_at ASC, id ASC
                    ) AS rn
                FROM games
                WHERE size = ?1 AND mode = ?2
            )
            WHERE rn = 1
            ORDER BY time_ms ASC, moves ASC, played_at ASC
            LIMIT ?3
            "#,
        )?;

        let rows = stmt
            .query_map(params![size, mode.as_str(), limit], |row| {
                Ok(LeaderboardEntry {
                    rank: 0,
                    player: row.get(0)?,
                    best_time_ms: row.get(1)?,
                    moves: row.get(2)?,
                    games: row.get(3)?,
                    played_at: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(i, entry)| LeaderboardEntry {
                rank: i as u32 + 1,
                ..entry
            })
            .collect();

        Ok(entries)
    }

    pub fn player_stats(&self, player: &str) -> Result<PlayerStats> {
        let stats = self.conn.query_row(
            r#"
            SELECT COUNT(*), MIN(time_ms), AVG(time_ms), MAX(size),
                SUM(CASE WHEN mode = 'classic' THEN 1 ELSE 0 END),
                SUM(CASE WHEN mode = 'time_trial' THEN 1 ELSE 0 END),
                SUM(CASE WHEN mode = 'puzzle' THEN 1 ELSE 0 END)
            FROM games WHERE player = ?1
            "#,
            params![player],
            |row| {
                let avg: Option<f64> = row.get(2)?;
                Ok(PlayerStats {
                    player: player.to_string(),
                    games_solved: row.get(0)?,
                    best_time_ms: row.get(1)?,
                    avg_time_ms: avg.map(|a| a.round() as u64),
                    largest_board: row.get(3)?,
                    classic: row.get::<_, Option<u32>>(4)?.unwrap_or(0),
                    time_trial: row.get::<_, Option<u32>>(5)?.unwrap_or(0),
                    puzzle: row.get::<_, Option<u32>>(6)?.unwrap_or(0),
                })
            },
        )?;

        Ok(stats)
    }

    pub fn insert_puzzle(&self, puzzle: &Puzzle) -> Result<i64> {
        let fixed = serde_json::to_string(&puzzle.fixed)?;

        self.conn.execute(
            r#"
            INSERT INTO puzzles (share_code, name, size, fixed, creator, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                puzzle.share_code,
                puzzle.name,
                puzzle.size,
                fixed,
                puzzle.creator,
                Self::now(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Looks a puzzle up by share code, ignoring case.
    pub fn get_puzzle(&self, code: &str) -> Result<Option<PuzzleRecord>> {
        let puzzle = self
            .conn
            .query_row(
                "SELECT share_code, name, size, fixed, creator, plays, solves, created_at
                 FROM puzzles WHERE share_code = ?1",
                params![code.trim().to_uppercase()],
                puzzle_from_row,
            )
            .optional()?;

        Ok(puzzle)
    }

    pub fn list_puzzles(&self, limit: u32) -> Result<Vec<PuzzleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT share_code, name, size, fixed, creator, plays, solves, created_at
             FROM puzzles ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let puzzles = stmt
            .query_map(params![limit], puzzle_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(puzzles)
    }

    pub fn count_puzzles(&self) -> Result<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM puzzles", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Counts a play of the puzzle. Returns `false` for an unknown code.
    pub fn record_puzzle_attempt(&self, code: &str, solved: bool) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE puzzles SET plays = plays + 1, solves = solves + ?2 WHERE share_code = ?1",
            params![code.trim().to_uppercase(), solved as u32],
        )?;
        Ok(updated > 0)
    }
}

fn json_column<T: serde::de::DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn game_from_row(row: &Row) -> rusqlite::Result<StoredGame> {
    let mode: String = row.get(2)?;
    let mode = mode
        .parse::<GameMode>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(StoredGame {
        id: row.get(0)?,
        player: row.get(1)?,
        mode,
        size: row.get(3)?,
        queens: json_column(row, 4)?,
        moves: row.get(5)?,
        time_ms: row.get(6)?,
        puzzle_code: row.get(7)?,
        played_at: row.get(8)?,
    })
}

fn puzzle_from_row(row: &Row) -> rusqlite::Result<PuzzleRecord> {
    Ok(PuzzleRecord {
        puzzle: Puzzle {
            share_code: row.get(0)?,
            name: row.get(1)?,
            size: row.get(2)?,
            fixed: json_column(row, 3)?,
            creator: row.get(4)?,
        },
        plays: row.get(5)?,
        solves: row.get(6)?,
        created_at: row.get(7)?,
    })
}
