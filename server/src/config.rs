//! Server configuration.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use todo_core::{DeleteMode, DEFAULT_DATABASE_PATH};

use crate::state::{HandlerOptions, ValidationOrder};

/// Which storage engine backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("memory"),
            StoreKind::Sqlite => f.write_str("sqlite"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "sqlite" => Ok(StoreKind::Sqlite),
            other => Err(format!("unknown store `{other}` (expected `memory` or `sqlite`)")),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub store: StoreKind,
    /// SQLite database file. Ignored by the memory store.
    pub database_path: PathBuf,
    pub delete_mode: DeleteMode,
    /// Register `GET /todos/{id}`.
    pub expose_get_by_id: bool,
    /// Validate request bodies before calling the store.
    pub validate_first: bool,
    /// Origin allowed by CORS.
    pub cors_origin: String,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

fn parse_flag(value: Option<String>) -> bool {
    value
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false)
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("TODO_SERVER_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("TODO_SERVER_PORT is not a valid port: `{raw}`"))?,
            None => 8080,
        };

        let store = match lookup("TODO_STORE") {
            Some(raw) => raw
                .parse::<StoreKind>()
                .map_err(|e| anyhow::anyhow!("TODO_STORE: {e}"))?,
            None => StoreKind::Sqlite,
        };

        let delete_mode = match lookup("TODO_DELETE_MODE") {
            Some(raw) => raw
                .parse::<DeleteMode>()
                .map_err(|e| anyhow::anyhow!("TODO_DELETE_MODE: {e}"))?,
            None => DeleteMode::Soft,
        };

        Ok(Self {
            host: lookup("TODO_SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            store,
            database_path: lookup("TODO_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),
            delete_mode,
            expose_get_by_id: parse_flag(lookup("TODO_EXPOSE_GET_BY_ID")),
            validate_first: parse_flag(lookup("TODO_VALIDATE_FIRST")),
            cors_origin: lookup("TODO_CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            log_level: lookup("TODO_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn handler_options(&self) -> HandlerOptions {
        HandlerOptions {
            validation: if self.validate_first {
                ValidationOrder::BeforeStore
            } else {
                ValidationOrder::AfterStore
            },
            expose_get_by_id: self.expose_get_by_id,
        }
    }
}
