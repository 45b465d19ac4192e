//! Storage core for the todo service.
//!
//! # Overview
//! - `TodoStore` is the storage contract the HTTP handlers program against.
//! - `MemoryStore` keeps todos in a vector for the life of the process.
//! - `SqliteStore` keeps them in a single SQLite table.
//! - `TodoClient` builds requests for, and parses responses from, the HTTP
//!   API without touching the network.
//!
//! # Design
//! - Stores are plain values constructed by the caller and shared behind an
//!   `Arc`; there is no process-wide instance.
//! - Soft and hard delete are a construction-time `DeleteMode`, not separate
//!   store types.

pub mod client;
pub mod error;
pub mod http;
pub mod store;
pub mod types;

pub use client::TodoClient;
pub use error::{ApiError, StoreError, StoreResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{DeleteMode, MemoryStore, SqliteStore, TodoStore, DEFAULT_DATABASE_PATH};
pub use types::{Todo, TodoId, TodoInput};
