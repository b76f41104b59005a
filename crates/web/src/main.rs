use std::sync::{Arc, Mutex, MutexGuard};

use queens_core::Database;

mod config;
mod error;
mod routes;

use config::Config;
use error::AppError;

pub struct AppState {
    pub db: Mutex<Database>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn db(&self) -> error::Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| AppError::Internal("database lock poisoned".to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let db = Database::open(&config.db_path)?;
    tracing::info!(db = %config.db_path.display(), "database ready");

    let state = Arc::new(AppState::new(db));
    let app = routes::router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Server running at http://{}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
