//! Handlers for `/todos` and everything under `/todos/`.
//!
//! Bodies are taken as raw bytes and decoded here so every malformed body,
//! whatever its content type, is a 400 with the same message.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use todo_core::{Todo, TodoId};

use crate::error::{ServerError, ServerResult};
use crate::state::{AppState, ValidationOrder};

fn decode_todo(body: &[u8]) -> ServerResult<Todo> {
    serde_json::from_slice(body).map_err(ServerError::Decode)
}

fn parse_id(raw: &str) -> ServerResult<TodoId> {
    raw.parse().map_err(|_| ServerError::InvalidId(raw.to_string()))
}

fn require_fields(todo: &Todo) -> ServerResult<()> {
    if todo.has_required_fields() {
        Ok(())
    } else {
        Err(ServerError::Validation)
    }
}

pub async fn list_todos(State(state): State<AppState>) -> ServerResult<Json<Vec<Todo>>> {
    let todos = state
        .store
        .get_all()
        .await
        .map_err(|e| ServerError::from_store("Failed to retrieve todos", e))?;
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<Todo>)> {
    let todo = decode_todo(&body)?;

    let validate_first = state.options.validation == ValidationOrder::BeforeStore;
    if validate_first {
        require_fields(&todo)?;
    }

    let created = state
        .store
        .create(todo)
        .await
        .map_err(|e| ServerError::from_store("Failed to add todo", e))?;

    if !validate_first {
        require_fields(&created)?;
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// Everything under `/todos/`. The id is parsed before the method is looked
/// at, so a malformed or nested id is a 400 whatever the method.
pub async fn todo_item(
    State(state): State<AppState>,
    method: Method,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Response {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match method {
        Method::GET if state.options.expose_get_by_id => {
            get_todo(&state, id).await.into_response()
        }
        Method::PUT => update_todo(&state, id, &body).await.into_response(),
        Method::DELETE => delete_todo(&state, id).await.into_response(),
        _ => ServerError::MethodNotAllowed.into_response(),
    }
}

async fn get_todo(state: &AppState, id: TodoId) -> ServerResult<Json<Todo>> {
    let todo = state
        .store
        .get_by_id(id)
        .await
        .map_err(|e| ServerError::from_store("Failed to retrieve todo", e))?;
    Ok(Json(todo))
}

async fn update_todo(state: &AppState, id: TodoId, body: &[u8]) -> ServerResult<Json<Todo>> {
    let mut todo = decode_todo(body)?;
    todo.id = id;

    let validate_first = state.options.validation == ValidationOrder::BeforeStore;
    if validate_first {
        require_fields(&todo)?;
    }

    let updated = state
        .store
        .update(id, todo)
        .await
        .map_err(|e| ServerError::from_store("Failed to update todo", e))?;

    if !validate_first {
        require_fields(&updated)?;
    }

    Ok(Json(updated))
}

async fn delete_todo(state: &AppState, id: TodoId) -> ServerResult<StatusCode> {
    state
        .store
        .delete(id)
        .await
        .map_err(|e| ServerError::from_store("Failed to delete todo", e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Router fallback. `/todos/` with nothing after the slash is an empty id,
/// anything else is an unknown route.
pub async fn unknown_route(uri: Uri) -> ServerError {
    if uri.path().starts_with("/todos/") {
        ServerError::InvalidId(String::new())
    } else {
        ServerError::RouteNotFound
    }
}

pub async fn method_not_allowed() -> ServerError {
    ServerError::MethodNotAllowed
}
