//! Shared state handed to every handler.

use std::sync::Arc;

use todo_core::TodoStore;

/// When the empty-field check runs relative to the store call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationOrder {
    /// Call the store first, then validate. A todo with empty fields is
    /// written (or rewritten) even though the response is 400, and a PUT to a
    /// missing id answers 404 before validation is reached.
    #[default]
    AfterStore,
    /// Validate first; a 400 never touches the store.
    BeforeStore,
}

/// Per-deployment switches for the handler layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerOptions {
    pub validation: ValidationOrder,
    /// Register `GET /todos/{id}`. Off by default.
    pub expose_get_by_id: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub options: HandlerOptions,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, options: HandlerOptions) -> Self {
        Self { store, options }
    }
}
