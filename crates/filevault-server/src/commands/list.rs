//! `list`: files under a directory path.

use axum::response::{IntoResponse, Response};

use super::{Params, bad_request, not_found, scope_rows, unauthorized};
use crate::AppState;

pub async fn handle(state: &AppState, auth: &str, params: &Params) -> Response {
    let path = params.get("p").cloned().unwrap_or_default();
    let grant = state.auth.authorize(auth, &format!("list {path}"));
    if grant.is_denied() {
        return unauthorized();
    }
    if path.is_empty() {
        return bad_request("No path specified.");
    }
    if !grant.contains(&path) {
        return unauthorized();
    }

    match state.vault.list_path(&path).await {
        Ok(entries) => scope_rows(&grant, &entries).into_response(),
        Err(_) => not_found(),
    }
}
