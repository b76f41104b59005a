//! SQLite storage for solved games and shared puzzles

mod db;
mod models;

pub use db::Database;
pub use models::*;
