use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server configuration, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            db_path: lookup("SHELF_DB_PATH").unwrap_or_else(|| "shelf.db".into()).into(),
            host: lookup("SHELF_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("SHELF_PORT")
                .unwrap_or_else(|| "3000".into())
                .parse::<u16>()
                .context("SHELF_PORT must be a valid port number")?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}
