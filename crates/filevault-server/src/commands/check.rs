//! `check`: storage consistency report, root scope only.

use axum::response::{IntoResponse, Response};

use super::{internal_error, unauthorized};
use crate::AppState;

pub async fn handle(state: &AppState, auth: &str) -> Response {
    let grant = state.auth.authorize(auth, "check");
    // A consistency sweep covers the whole store, so only the root scope
    // may run it.
    if grant.root_dir != "/" {
        return unauthorized();
    }

    match state.vault.check().await {
        Ok(report) => {
            let body: String = report.iter().map(|line| format!("{line}\n")).collect();
            body.into_response()
        }
        Err(e) => {
            tracing::error!("Consistency check failed: {}", e);
            internal_error(e.to_string())
        }
    }
}
