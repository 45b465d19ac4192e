//! SQLite-backed todo store.
//!
//! # Invariants
//! - The `todos` table exists once `open` returns; bootstrap is idempotent.
//! - UPDATE and DELETE that affect zero rows fail with `NotFound`.
//! - Read and write paths only match rows with `deleted = 0`.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info};

use super::{DeleteMode, TodoStore};
use crate::error::{StoreError, StoreResult};
use crate::types::{Todo, TodoId};

/// Database file used when no path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "/app/database/todos.db";

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0,
    deleted BOOLEAN NOT NULL DEFAULT 0
)";

const TODO_SELECT_SQL: &str = "SELECT id, title, description, completed, deleted FROM todos";

/// Todo store over a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
    mode: DeleteMode,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`, or at
    /// `DEFAULT_DATABASE_PATH` when `path` is `None`, and bootstraps the schema.
    pub async fn open(path: Option<&Path>, mode: DeleteMode) -> StoreResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));
        let started_at = Instant::now();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool, mode };
        store.bootstrap().await?;

        info!(
            path = %path.display(),
            delete_mode = %mode,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "db_open"
        );
        Ok(store)
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to one connection that never expires, since every
    /// new connection to `:memory:` would see an empty database.
    pub async fn open_in_memory(mode: DeleteMode) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool, mode };
        store.bootstrap().await?;
        info!(delete_mode = %mode, "db_open in-memory");
        Ok(store)
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn bootstrap(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

fn parse_todo_row(row: &SqliteRow) -> Result<Todo, sqlx::Error> {
    Ok(Todo {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        deleted: row.try_get("deleted")?,
    })
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn get_all(&self) -> StoreResult<Vec<Todo>> {
        let rows = sqlx::query(&format!("{TODO_SELECT_SQL} WHERE deleted = 0 ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        let todos = rows
            .iter()
            .map(parse_todo_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(todos)
    }

    async fn get_by_id(&self, id: TodoId) -> StoreResult<Todo> {
        let row = sqlx::query(&format!("{TODO_SELECT_SQL} WHERE id = ? AND deleted = 0"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(parse_todo_row(&row)?),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn create(&self, todo: Todo) -> StoreResult<Todo> {
        let result = sqlx::query(
            "INSERT INTO todos (title, description, completed, deleted) VALUES (?, ?, ?, 0)",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, "sqlite store: created todo");
        Ok(Todo {
            id,
            deleted: false,
            ..todo
        })
    }

    async fn update(&self, id: TodoId, todo: Todo) -> StoreResult<Todo> {
        let result = sqlx::query(
            "UPDATE todos
             SET title = ?, description = ?, completed = ?, deleted = ?
             WHERE id = ? AND deleted = 0",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.deleted)
        .bind(id)
        .execute(&self.pool)
        .await?;

        let changed = result.rows_affected();
        debug!(id, changed, "sqlite store: updated todo");
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(Todo { id, ..todo })
    }

    async fn delete(&self, id: TodoId) -> StoreResult<()> {
        let sql = match self.mode {
            DeleteMode::Hard => "DELETE FROM todos WHERE id = ? AND deleted = 0",
            DeleteMode::Soft => "UPDATE todos SET deleted = 1 WHERE id = ? AND deleted = 0",
        };
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;

        let changed = result.rows_affected();
        debug!(id, changed, mode = %self.mode, "sqlite store: deleted todo");
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn delete_mode(&self) -> DeleteMode {
        self.mode
    }
}
