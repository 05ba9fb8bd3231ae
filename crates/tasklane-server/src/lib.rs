//! HTTP API for tasklane.
//!
//! Exposes the task store and the derived board (levels, critical path and
//! earliest start dates) as JSON under `/api`. The binary in `main.rs` opens
//! the repository found from the current directory and serves it.

#![forbid(unsafe_code)]

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

pub use error::ApiError;
pub use routes::{AppState, router, serve};
