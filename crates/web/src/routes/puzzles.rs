//! Puzzle creation and sharing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use queens_core::puzzle::MAX_NAME_LEN;
use queens_core::storage::PuzzleRecord;
use queens_core::{Difficulty, Position, Puzzle};

use super::api::{validate_player, LimitQuery};
use super::clamp_limit;
use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Serialize)]
pub struct PuzzleView {
    #[serde(flatten)]
    pub puzzle: Puzzle,
    pub difficulty: Difficulty,
    pub plays: u32,
    pub solves: u32,
}

impl From<PuzzleRecord> for PuzzleView {
    fn from(record: PuzzleRecord) -> Self {
        Self {
            difficulty: record.puzzle.difficulty(),
            puzzle: record.puzzle,
            plays: record.plays,
            solves: record.solves,
        }
    }
}

impl From<Puzzle> for PuzzleView {
    fn from(puzzle: Puzzle) -> Self {
        Self {
            difficulty: puzzle.difficulty(),
            puzzle,
            plays: 0,
            solves: 0,
        }
    }
}

#[derive(Deserialize)]
pub struct CreatePuzzleRequest {
    pub name: String,
    pub size: usize,
    #[serde(default)]
    pub fixed: Vec<Position>,
    pub creator: Option<String>,
}

#[derive(Deserialize)]
pub struct GeneratePuzzleRequest {
    pub size: usize,
    pub prefilled: Option<usize>,
    pub name: Option<String>,
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePuzzleRequest>,
) -> Result<(StatusCode, Json<PuzzleView>)> {
    let creator = req.creator.as_deref().map(validate_player).transpose()?;
    let puzzle = Puzzle::new(&req.name, req.size, req.fixed, creator)?;

    state.db()?.insert_puzzle(&puzzle)?;
    tracing::info!(code = %puzzle.share_code, size = puzzle.size, "puzzle created");

    Ok((StatusCode::CREATED, Json(puzzle.into())))
}

/// Random puzzle; half the queens are placed unless `prefilled` says otherwise.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GeneratePuzzleRequest>,
) -> Result<(StatusCode, Json<PuzzleView>)> {
    let prefilled = req.prefilled.unwrap_or(req.size / 2);
    let mut puzzle = Puzzle::generate(req.size, prefilled, &mut rand::rng())?;
    if let Some(name) = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        puzzle.name = name.to_string();
    }

    state.db()?.insert_puzzle(&puzzle)?;
    tracing::info!(code = %puzzle.share_code, size = puzzle.size, prefilled, "puzzle generated");

    Ok((StatusCode::CREATED, Json(puzzle.into())))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<PuzzleView>>> {
    let puzzles = state.db()?.list_puzzles(clamp_limit(query.limit, 20))?;
    Ok(Json(puzzles.into_iter().map(PuzzleView::from).collect()))
}

pub async fn get_puzzle(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<PuzzleView>> {
    let record = state
        .db()?
        .get_puzzle(&code)?
        .ok_or_else(|| AppError::NotFound(format!("no puzzle with code {}", code)))?;
    Ok(Json(record.into()))
}
