//! Game modes and live board sessions

mod session;
mod types;

pub use session::{GameSession, Toggle};
pub use types::*;
