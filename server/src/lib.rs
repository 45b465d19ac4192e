//! HTTP API for the todo service.
//!
//! `app` builds the bare router over an `AppState`; `create_app` wraps it
//! with request tracing and CORS for a deployed process.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use todo_core::{MemoryStore, SqliteStore, TodoStore};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::{Config, StoreKind};
use crate::handlers::{create_todo, list_todos, method_not_allowed, todo_item, unknown_route};

pub use crate::state::{AppState, HandlerOptions, ValidationOrder};

/// Routes for `/todos` and everything under `/todos/`.
///
/// `GET /todos/{id}` is only served when `expose_get_by_id` is set;
/// otherwise it answers 405 like any other unsupported method. Every
/// response is labelled `application/json`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(list_todos).post(create_todo).fallback(method_not_allowed),
        )
        .route("/todos/{*id}", any(todo_item))
        .fallback(unknown_route)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
}

/// Creates the application router with tracing and CORS configured.
///
/// A `*` origin reflects the request's `Origin` back, since a literal
/// wildcard cannot be combined with credentials.
pub fn create_app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let origin = match config.cors_origin.trim() {
        "*" => AllowOrigin::mirror_request(),
        exact => {
            let value: HeaderValue = exact
                .parse()
                .with_context(|| format!("invalid CORS origin `{}`", config.cors_origin))?;
            AllowOrigin::exact(value)
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Ok(app(state).layer(TraceLayer::new_for_http()).layer(cors))
}

/// Opens the store selected by `config`.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new(config.delete_mode)),
        StoreKind::Sqlite => {
            let store = SqliteStore::open(Some(&config.database_path), config.delete_mode)
                .await
                .with_context(|| {
                    format!(
                        "failed to open SQLite store at {}",
                        config.database_path.display()
                    )
                })?;
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn run(
    listener: TcpListener,
    router: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}
