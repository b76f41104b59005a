//! JSON API: conflict checks, solved-game submission, rankings

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use queens_core::board::validate_board_size;
use queens_core::game::time_limit_ms;
use queens_core::storage::{LeaderboardEntry, NewGame, PlayerStats, StoredGame};
use queens_core::{
    conflicting_pairs, find_conflicts, is_valid_solution, solver, validate_solution, Conflict,
    GameMode, Position, MAX_BOARD_SIZE,
};

use super::{clamp_limit, BoardQuery};
use crate::error::{AppError, Result};
use crate::AppState;

pub const MAX_PLAYER_LEN: usize = 32;
/// Queens a check request may send: one per square of the largest board.
pub const MAX_CHECK_QUEENS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE;
/// Pairs listed in a check response; `conflicts` is always complete.
pub const MAX_CHECK_PAIRS: usize = 64;
/// One day.
pub const MAX_TIME_MS: u64 = 24 * 60 * 60 * 1000;

// ============================================================================
// CHECK
// ============================================================================

#[derive(Deserialize)]
pub struct CheckRequest {
    pub size: Option<usize>,
    pub queens: Vec<Position>,
}

#[derive(Serialize)]
pub struct CheckResponse {
    pub conflicts: Vec<Position>,
    pub pairs: Vec<Conflict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solved: Option<bool>,
}

/// Highlights attacked queens; with a board size, also says whether the
/// board is solved.
pub async fn check(Json(req): Json<CheckRequest>) -> Result<Json<CheckResponse>> {
    let limit = req.size.map_or(MAX_CHECK_QUEENS, |n| n.min(MAX_CHECK_QUEENS));
    if req.queens.len() > limit {
        return Err(AppError::BadRequest(format!(
            "at most {} queens can be checked, got {}",
            limit,
            req.queens.len()
        )));
    }

    let mut conflicts: Vec<Position> = find_conflicts(&req.queens).into_iter().collect();
    conflicts.sort();
    let mut pairs = conflicting_pairs(&req.queens);
    pairs.truncate(MAX_CHECK_PAIRS);

    Ok(Json(CheckResponse {
        conflicts,
        pairs,
        solved: req.size.map(|n| is_valid_solution(&req.queens, n)),
    }))
}

// ============================================================================
// SUBMIT
// ============================================================================

#[derive(Deserialize)]
pub struct SubmitGameRequest {
    pub player: String,
    pub mode: GameMode,
    pub size: usize,
    pub queens: Vec<Position>,
    pub moves: u32,
    pub time_ms: u64,
    pub puzzle: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitGameResponse {
    pub id: i64,
}

pub fn validate_player(player: &str) -> Result<String> {
    let player = player.trim();
    if player.is_empty() || player.chars().count() > MAX_PLAYER_LEN {
        return Err(AppError::BadRequest(format!(
            "player name must be 1 to {} characters",
            MAX_PLAYER_LEN
        )));
    }
    Ok(player.to_string())
}

/// Records a solved game after checking the board on the server.
///
/// The client's own verdict is never trusted: a board that fails the
/// check is answered with 400 and nothing is stored.
pub async fn submit_game(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitGameRequest>,
) -> Result<(StatusCode, Json<SubmitGameResponse>)> {
    let player = validate_player(&req.player)?;
    validate_board_size(req.size)?;
    if req.time_ms > MAX_TIME_MS {
        return Err(AppError::BadRequest(format!(
            "time must be at most {} ms",
            MAX_TIME_MS
        )));
    }

    let db = state.db()?;

    let (puzzle_code, placed_by_player) = match req.mode {
        GameMode::Puzzle => {
            let code = req
                .puzzle
                .as_deref()
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| AppError::BadRequest("puzzle games need a puzzle code".to_string()))?;
            let record = db
                .get_puzzle(&code)?
                .ok_or_else(|| AppError::NotFound(format!("no puzzle with code {}", code)))?;
            if record.puzzle.size != req.size {
                return Err(AppError::BadRequest(format!(
                    "puzzle {} is played on a {}x{} board",
                    code, record.puzzle.size, record.puzzle.size
                )));
            }
            if let Err(reason) = record.puzzle.accepts(&req.queens) {
                db.record_puzzle_attempt(&code, false)?;
                tracing::warn!(%player, %code, %reason, "rejected puzzle submission");
                return Err(AppError::BadRequest(format!("Invalid solution: {}", reason)));
            }
            (Some(code), req.size - record.puzzle.fixed.len())
        }
        GameMode::Classic | GameMode::TimeTrial => {
            if let Err(reason) = validate_solution(&req.queens, req.size) {
                tracing::warn!(%player, size = req.size, %reason, "rejected submission");
                return Err(AppError::BadRequest(format!("Invalid solution: {}", reason)));
            }
            (None, req.size)
        }
    };

    if req.mode == GameMode::TimeTrial && req.time_ms > time_limit_ms(req.size) {
        tracing::warn!(%player, time_ms = req.time_ms, "time trial over the limit");
        return Err(AppError::BadRequest(format!(
            "time trial limit of {} ms exceeded",
            time_limit_ms(req.size)
        )));
    }
    if (req.moves as usize) < placed_by_player {
        return Err(AppError::BadRequest(format!(
            "{} moves cannot place {} queens",
            req.moves, placed_by_player
        )));
    }

    let id = db.insert_game(&NewGame {
        player: player.clone(),
        mode: req.mode,
        size: req.size,
        queens: req.queens,
        moves: req.moves,
        time_ms: req.time_ms,
        puzzle_code: puzzle_code.clone(),
    })?;
    if let Some(code) = &puzzle_code {
        db.record_puzzle_attempt(code, true)?;
    }

    tracing::info!(id, %player, mode = req.mode.as_str(), size = req.size, "game recorded");
    Ok((StatusCode::CREATED, Json(SubmitGameResponse { id })))
}

// ============================================================================
// QUERIES
// ============================================================================

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

pub async fn recent_games(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<StoredGame>>> {
    let games = state.db()?.get_recent_games(clamp_limit(query.limit, 20))?;
    Ok(Json(games))
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BoardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let size = query.size();
    validate_board_size(size)?;
    let mode = query.mode()?;
    let entries = state
        .db()?
        .leaderboard(size, mode, clamp_limit(query.limit, 10))?;
    Ok(Json(entries))
}

pub async fn player_stats(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
) -> Result<Json<PlayerStats>> {
    let player = validate_player(&player)?;
    let stats = state.db()?.player_stats(&player)?;
    Ok(Json(stats))
}

#[derive(Serialize)]
pub struct SolveResponse {
    pub size: usize,
    pub queens: Vec<Position>,
}

pub async fn solve(Path(size): Path<usize>) -> Result<Json<SolveResponse>> {
    validate_board_size(size)?;
    let queens = solver::solve(size)
        .ok_or_else(|| AppError::NotFound(format!("no solution for a {}x{} board", size, size)))?;
    Ok(Json(SolveResponse { size, queens }))
}
