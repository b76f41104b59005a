//! Server configuration from the environment
//!
//! | variable | default |
//! |---|---|
//! | `QUEENS_DB` | `queens.db` |
//! | `QUEENS_ADDR` | `127.0.0.1:3000` |
//! | `QUEENS_STATIC_DIR` | `crates/web/static` |

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_DB: &str = "queens.db";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_STATIC_DIR: &str = "crates/web/static";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("QUEENS_ADDR '{value}' is not a socket address: {source}")]
    InvalidAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let addr = get("QUEENS_ADDR", DEFAULT_ADDR);
        let addr = addr
            .parse()
            .map_err(|source| ConfigError::InvalidAddr { value: addr, source })?;

        Ok(Self {
            db_path: PathBuf::from(get("QUEENS_DB", DEFAULT_DB)),
            addr,
            static_dir: PathBuf::from(get("QUEENS_STATIC_DIR", DEFAULT_STATIC_DIR)),
        })
    }
}
