use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use queens_core::{storage::StoredGame, GameMode, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

use crate::error::Result;
use crate::AppState;

pub mod api;
pub mod puzzles;

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/leaderboard", get(leaderboard_page))
        .route("/health", get(health))
        .route("/api/check", post(api::check))
        .route("/api/games", post(api::submit_game))
        .route("/api/games/recent", get(api::recent_games))
        .route("/api/leaderboard", get(api::leaderboard))
        .route("/api/players/:player/stats", get(api::player_stats))
        .route("/api/solve/:size", get(api::solve))
        .route("/api/puzzles", post(puzzles::create).get(puzzles::list))
        .route("/api/puzzles/generate", post(puzzles::generate))
        .route("/api/puzzles/:code", get(puzzles::get_puzzle))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

// ============================================================================
// PAGES
// ============================================================================

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub games_count: u32,
    pub puzzles_count: u32,
    pub games: Vec<GameRow>,
}

#[derive(Template)]
#[template(path = "leaderboard.html")]
pub struct LeaderboardTemplate {
    pub title: String,
    pub size: usize,
    pub mode: String,
    pub sizes: Vec<usize>,
    pub modes: Vec<(String, String)>,
    pub entries: Vec<LeaderRow>,
}

pub struct GameRow {
    pub id: i64,
    pub player: String,
    pub mode: String,
    pub board: String,
    pub time: String,
    pub moves: u32,
    pub date: String,
}

impl From<&StoredGame> for GameRow {
    fn from(g: &StoredGame) -> Self {
        Self {
            id: g.id,
            player: g.player.clone(),
            mode: g.mode.display_name().to_string(),
            board: format!("{}x{}", g.size, g.size),
            time: format_duration(g.time_ms),
            moves: g.moves,
            date: format_date(g.played_at),
        }
    }
}

pub struct LeaderRow {
    pub rank: u32,
    pub player: String,
    pub time: String,
    pub moves: u32,
    pub games: u32,
    pub date: String,
}

#[derive(Deserialize)]
pub struct BoardQuery {
    pub size: Option<usize>,
    pub mode: Option<String>,
    pub limit: Option<u32>,
}

impl BoardQuery {
    pub fn size(&self) -> usize {
        self.size.unwrap_or(8)
    }

    pub fn mode(&self) -> Result<GameMode> {
        match &self.mode {
            Some(mode) => Ok(mode.parse()?),
            None => Ok(GameMode::Classic),
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let (games_count, puzzles_count, recent) = {
        let db = state.db()?;
        (db.count_games()?, db.count_puzzles()?, db.get_recent_games(20)?)
    };

    let template = IndexTemplate {
        title: "N-Queens".to_string(),
        games_count,
        puzzles_count,
        games: recent.iter().map(GameRow::from).collect(),
    };
    Ok(Html(template.render()?))
}

pub async fn leaderboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BoardQuery>,
) -> Result<Html<String>> {
    let size = query.size();
    let mode = query.mode()?;
    let entries = state
        .db()?
        .leaderboard(size, mode, clamp_limit(query.limit, 25))?;

    let template = LeaderboardTemplate {
        title: format!("Leaderboard: {}x{} {}", size, size, mode.display_name()),
        size,
        mode: mode.as_str().to_string(),
        sizes: (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).collect(),
        modes: GameMode::ALL
            .iter()
            .map(|m| (m.as_str().to_string(), m.display_name().to_string()))
            .collect(),
        entries: entries
            .into_iter()
            .map(|e| LeaderRow {
                rank: e.rank,
                player: e.player,
                time: format_duration(e.best_time_ms),
                moves: e.moves,
                games: e.games,
                date: format_date(e.played_at),
            })
            .collect(),
    };
    Ok(Html(template.render()?))
}

pub async fn health() -> &'static str {
    "OK"
}

// ============================================================================
// HELPERS
// ============================================================================

pub const MAX_PAGE: u32 = 100;

pub fn clamp_limit(limit: Option<u32>, default: u32) -> u32 {
    limit.unwrap_or(default).clamp(1, MAX_PAGE)
}

/// `m:ss.t`
pub fn format_duration(ms: u64) -> String {
    let tenths = (ms % 1000) / 100;
    let secs = ms / 1000;
    format!("{}:{:02}.{}", secs / 60, secs % 60, tenths)
}

fn format_date(secs: u64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use queens_core::Database;
    use serde_json::Value;
    use tower::ServiceExt;

    pub fn app() -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::new(Database::open_in_memory().unwrap()));
        (router(state.clone(), Path::new("static")), state)
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    pub async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn text_body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00.0");
        assert_eq!(format_duration(61_250), "1:01.2");
        assert_eq!(format_duration(600_000), "10:00.0");
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None, 20), 20);
        assert_eq!(clamp_limit(Some(0), 20), 1);
        assert_eq!(clamp_limit(Some(5000), 20), MAX_PAGE);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = send(&app, "GET", "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text_body(response).await, "OK");
    }

    #[tokio::test]
    async fn test_pages_render() {
        let (app, _) = app();
        let response = send(&app, "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains("N-Queens"));

        let response = send(&app, "GET", "/leaderboard?size=6&mode=time_trial", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(text_body(response).await.contains("6x6 Time Trial"));

        let response = send(&app, "GET", "/leaderboard?mode=blitz", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
