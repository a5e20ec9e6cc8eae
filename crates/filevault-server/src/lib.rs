//! filevault-server library: exposes the protocol layer for integration
//! tests.
//!
//! The server fronts a content-addressed file store with a small plain-text
//! protocol: every request names a command in its first path segment and
//! carries a signed capability token scoping it to one exact operation.

pub mod auth;
pub mod commands;
pub mod config;
pub mod keystore;
pub mod render;
pub mod session;
pub mod staging;

use std::sync::Arc;

use axum::Router;
use axum::routing::any;
use tower_http::trace::TraceLayer;

use filevault_engine::Vault;

use crate::auth::Authenticator;
use crate::staging::Staging;

/// Shared application state
pub struct AppState {
    pub auth: Authenticator,
    pub vault: Arc<dyn Vault>,
    pub staging: Staging,
}

/// Build the command router over the shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(commands::dispatch_root))
        .route("/{command}", any(commands::dispatch_bare))
        .route("/{command}/{name}", any(commands::dispatch_named))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
