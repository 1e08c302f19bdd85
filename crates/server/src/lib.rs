//! Suggestion box server library.
//!
//! This crate provides the REST service as a library, allowing it to be
//! tested in-process and driven by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::future::Future;

use axum::{ServiceExt, extract::Request};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

pub use routes::app;
pub use state::AppState;

/// Serve the application on `listener` until `shutdown` resolves.
///
/// Trailing slashes are trimmed before routing, so `/api/suggestions/`
/// reaches the same handler as `/api/suggestions`.
///
/// # Errors
///
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = NormalizePathLayer::trim_trailing_slash().layer(app(state));

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
}
