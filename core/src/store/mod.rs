//! Storage contract for todos and its two engines.
//!
//! # Design
//! Both engines assign ids on create and return the stored record, so the
//! handlers never need to know which engine is active. A `DeleteMode` picked
//! at construction decides whether `delete` removes the record or flags it;
//! either way the record disappears from every read path.

mod memory;
mod sqlite;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Todo, TodoId};

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, DEFAULT_DATABASE_PATH};

/// How `TodoStore::delete` disposes of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Physically remove the record.
    Hard,
    /// Keep the record and set `deleted = true`.
    #[default]
    Soft,
}

impl DeleteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteMode::Hard => "hard",
            DeleteMode::Soft => "soft",
        }
    }
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeleteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(DeleteMode::Hard),
            "soft" => Ok(DeleteMode::Soft),
            other => Err(format!("unknown delete mode `{other}` (expected `hard` or `soft`)")),
        }
    }
}

/// Operations every todo store provides.
///
/// A record with `deleted = true` is treated as absent by every method.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Returns all live todos, oldest first.
    async fn get_all(&self) -> StoreResult<Vec<Todo>>;

    /// Returns the live todo with `id`.
    async fn get_by_id(&self, id: TodoId) -> StoreResult<Todo>;

    /// Stores a new todo and returns it with its assigned id.
    ///
    /// Any id on the input is ignored and `deleted` is always stored as false.
    async fn create(&self, todo: Todo) -> StoreResult<Todo>;

    /// Replaces every mutable field of the live todo with `id`.
    async fn update(&self, id: TodoId, todo: Todo) -> StoreResult<Todo>;

    /// Removes or flags the live todo with `id`, depending on `delete_mode`.
    async fn delete(&self, id: TodoId) -> StoreResult<()>;

    fn delete_mode(&self) -> DeleteMode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_mode_parses_case_insensitively() {
        assert_eq!("HARD".parse::<DeleteMode>().unwrap(), DeleteMode::Hard);
        assert_eq!(" soft ".parse::<DeleteMode>().unwrap(), DeleteMode::Soft);
        assert!("archive".parse::<DeleteMode>().is_err());
    }

    #[test]
    fn delete_mode_display_matches_parse() {
        for mode in [DeleteMode::Hard, DeleteMode::Soft] {
            assert_eq!(mode.to_string().parse::<DeleteMode>().unwrap(), mode);
        }
    }

    #[test]
    fn soft_is_default() {
        assert_eq!(DeleteMode::default(), DeleteMode::Soft);
    }
}
