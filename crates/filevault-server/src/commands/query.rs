//! `query`: term search over vault paths.

use axum::response::{IntoResponse, Response};

use super::{Params, bad_request, not_found, scope_rows, unauthorized};
use crate::AppState;

pub async fn handle(state: &AppState, auth: &str, params: &Params) -> Response {
    let terms = params.get("t").cloned().unwrap_or_default();
    let grant = state.auth.authorize(auth, &format!("query {terms}"));
    if grant.is_denied() {
        return unauthorized();
    }
    if terms.is_empty() {
        return bad_request("No query terms specified.");
    }

    match state.vault.query(&terms).await {
        Ok(entries) => scope_rows(&grant, &entries).into_response(),
        Err(_) => not_found(),
    }
}
