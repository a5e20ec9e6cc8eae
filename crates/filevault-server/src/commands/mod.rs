//! Command dispatch for the vault protocol.
//!
//! Every request names a command in its first path segment and carries an
//! `auth` capability token in the query string. Requests without a token are
//! refused before dispatch; unknown commands are bad requests. Dispatch
//! itself holds no state.

mod check;
mod exist;
mod extract;
mod hash;
mod import;
mod info;
mod list;
mod query;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use filevault_engine::Entry;

use crate::AppState;
use crate::auth::AccessGrant;
use crate::render;
use crate::session::Session;

/// The closed set of protocol commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Check,
    Exist,
    Extract,
    Hash,
    Import,
    Info,
    List,
    Query,
}

impl Command {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "check" => Some(Self::Check),
            "exist" => Some(Self::Exist),
            "extract" => Some(Self::Extract),
            "hash" => Some(Self::Hash),
            "import" => Some(Self::Import),
            "info" => Some(Self::Info),
            "list" => Some(Self::List),
            "query" => Some(Self::Query),
            _ => None,
        }
    }
}

/// Query parameters as a flat map; commands pull what they need.
pub type Params = HashMap<String, String>;

pub async fn dispatch_root(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
    request: Request,
) -> Response {
    dispatch(state, String::new(), None, params, request).await
}

pub async fn dispatch_bare(
    State(state): State<Arc<AppState>>,
    Path(command): Path<String>,
    Query(params): Query<Params>,
    request: Request,
) -> Response {
    dispatch(state, command, None, params, request).await
}

pub async fn dispatch_named(
    State(state): State<Arc<AppState>>,
    Path((command, name)): Path<(String, String)>,
    Query(params): Query<Params>,
    request: Request,
) -> Response {
    dispatch(state, command, Some(name), params, request).await
}

async fn dispatch(
    state: Arc<AppState>,
    command: String,
    trailing: Option<String>,
    params: Params,
    request: Request,
) -> Response {
    // Fast path: without a token nothing downstream can succeed.
    let Some(auth) = params.get("auth").cloned() else {
        return unauthorized();
    };
    let Some(command) = Command::parse(&command) else {
        return bad_request("Unknown command.");
    };

    let session = Session::generate();
    match command {
        Command::Check => check::handle(&state, &auth).await,
        Command::Exist => exist::handle(&state, &auth, &params).await,
        Command::Extract => extract::handle(&state, &auth, &params, trailing, &session).await,
        Command::Hash => hash::handle(&state, &auth, &params).await,
        Command::Import => import::handle(&state, &auth, &session, request).await,
        Command::Info => info::handle(&state, &auth, &params).await,
        Command::List => list::handle(&state, &auth, &params).await,
        Command::Query => query::handle(&state, &auth, &params).await,
    }
}

pub(crate) fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

pub(crate) fn bad_request(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

pub(crate) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

pub(crate) fn internal_error(message: String) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

/// Render listing rows, silently dropping paths outside the caller's scope.
pub(crate) fn scope_rows(grant: &AccessGrant, entries: &[Entry]) -> String {
    entries
        .iter()
        .filter(|entry| grant.contains(&entry.path))
        .map(|entry| render::row(entry.file_id, &entry.path))
        .collect()
}
