//! `hash`: files storing content with a given digest.

use axum::response::{IntoResponse, Response};

use super::{Params, bad_request, not_found, scope_rows, unauthorized};
use crate::AppState;

pub async fn handle(state: &AppState, auth: &str, params: &Params) -> Response {
    let hash = params.get("h").cloned().unwrap_or_default();
    let grant = state.auth.authorize(auth, &format!("hash {hash}"));
    if grant.is_denied() {
        return unauthorized();
    }
    if hash.is_empty() {
        return bad_request("No hash specified.");
    }

    match state.vault.list_hash(&hash).await {
        Ok(entries) => scope_rows(&grant, &entries).into_response(),
        Err(_) => not_found(),
    }
}
