//! Vector-backed store that lives for the lifetime of the process.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{DeleteMode, TodoStore};
use crate::error::{StoreError, StoreResult};
use crate::types::{Todo, TodoId};

#[derive(Debug)]
struct MemoryState {
    todos: Vec<Todo>,
    next_id: TodoId,
}

/// In-memory todo store.
///
/// Records keep insertion order. Lookups are linear scans by id.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    mode: DeleteMode,
}

impl MemoryStore {
    pub fn new(mode: DeleteMode) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                todos: Vec::new(),
                next_id: 1,
            }),
            mode,
        }
    }

    /// Number of stored rows, soft-deleted ones included.
    pub async fn len(&self) -> usize {
        self.state.read().await.todos.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DeleteMode::Hard)
    }
}

fn live_position(todos: &[Todo], id: TodoId) -> Option<usize> {
    todos.iter().position(|t| t.id == id && !t.deleted)
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn get_all(&self) -> StoreResult<Vec<Todo>> {
        let state = self.state.read().await;
        Ok(state.todos.iter().filter(|t| !t.deleted).cloned().collect())
    }

    async fn get_by_id(&self, id: TodoId) -> StoreResult<Todo> {
        let state = self.state.read().await;
        live_position(&state.todos, id)
            .map(|i| state.todos[i].clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn create(&self, todo: Todo) -> StoreResult<Todo> {
        let mut state = self.state.write().await;
        let stored = Todo {
            id: state.next_id,
            deleted: false,
            ..todo
        };
        state.next_id += 1;
        state.todos.push(stored.clone());
        debug!(id = stored.id, "memory store: created todo");
        Ok(stored)
    }

    async fn update(&self, id: TodoId, todo: Todo) -> StoreResult<Todo> {
        let mut state = self.state.write().await;
        let index = live_position(&state.todos, id).ok_or(StoreError::NotFound(id))?;
        let stored = Todo { id, ..todo };
        state.todos[index] = stored.clone();
        debug!(id, "memory store: updated todo");
        Ok(stored)
    }

    async fn delete(&self, id: TodoId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let index = live_position(&state.todos, id).ok_or(StoreError::NotFound(id))?;
        match self.mode {
            DeleteMode::Hard => {
                state.todos.remove(index);
            }
            DeleteMode::Soft => state.todos[index].deleted = true,
        }
        debug!(id, mode = %self.mode, "memory store: deleted todo");
        Ok(())
    }

    fn delete_mode(&self) -> DeleteMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_increase_from_one() {
        let store = MemoryStore::default();
        let a = store.create(Todo::new("a", "1")).await.unwrap();
        let b = store.create(Todo::new("b", "2")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn caller_supplied_id_is_ignored() {
        let store = MemoryStore::default();
        let input = Todo {
            id: 99,
            deleted: true,
            ..Todo::new("a", "b")
        };
        let created = store.create(input).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(!created.deleted);
        assert!(store.get_by_id(99).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn hard_delete_preserves_order_of_the_rest() {
        let store = MemoryStore::new(DeleteMode::Hard);
        for title in ["a", "b", "c"] {
            store.create(Todo::new(title, "x")).await.unwrap();
        }
        store.delete(2).await.unwrap();

        let titles: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["a", "c"]);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn soft_delete_keeps_the_row() {
        let store = MemoryStore::new(DeleteMode::Soft);
        let todo = store.create(Todo::new("a", "b")).await.unwrap();
        store.delete(todo.id).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(store.get_all().await.unwrap().is_empty());
        assert!(store.get_by_id(todo.id).await.unwrap_err().is_not_found());
        assert!(store.delete(todo.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_hard_delete() {
        let store = MemoryStore::new(DeleteMode::Hard);
        let first = store.create(Todo::new("a", "b")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(Todo::new("c", "d")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::default());
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(Todo::new(format!("todo {i}"), "x"))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }

        assert_eq!(ids.len(), 64);
        assert_eq!(store.len().await, 64);
        assert_eq!(ids.iter().copied().max(), Some(64));
    }
}
