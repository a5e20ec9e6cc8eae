//! `exist`: file ids stored under an exact vault path.

use axum::response::{IntoResponse, Response};

use super::{Params, bad_request, not_found, unauthorized};
use crate::AppState;
use crate::render;

pub async fn handle(state: &AppState, auth: &str, params: &Params) -> Response {
    let filename = params.get("fn").cloned().unwrap_or_default();
    let grant = state.auth.authorize(auth, &format!("exist {filename}"));
    if grant.is_denied() {
        return unauthorized();
    }
    if filename.is_empty() {
        return bad_request("No filename specified.");
    }
    if !grant.contains(&filename) {
        return unauthorized();
    }

    match state.vault.query_filename(&filename).await {
        Ok(file_ids) => {
            let body: String = file_ids.iter().map(|id| render::id_row(*id)).collect();
            body.into_response()
        }
        Err(_) => not_found(),
    }
}
