//! `info`: single-record metadata, or a version banner as an authenticated
//! liveness probe.

use axum::response::{IntoResponse, Response};

use super::{Params, bad_request, not_found, unauthorized};
use crate::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn handle(state: &AppState, auth: &str, params: &Params) -> Response {
    let fid = params.get("f").cloned().unwrap_or_default();

    if fid.is_empty() {
        let grant = state.auth.authorize(auth, "info");
        if grant.is_denied() {
            return unauthorized();
        }
        return format!("filevault-server v{VERSION}\n").into_response();
    }

    let grant = state.auth.authorize(auth, &format!("info {fid}"));
    if grant.is_denied() {
        return unauthorized();
    }
    let Ok(file_id) = fid.parse::<u64>() else {
        return bad_request("Invalid file_id.");
    };
    if file_id == 0 {
        return bad_request("Invalid file_id.");
    }

    let record = match state.vault.info(file_id).await {
        Ok(record) => record,
        Err(_) => return not_found(),
    };
    if !grant.contains(&record.path) {
        return unauthorized();
    }

    format!(
        "File ID: {}\nPath: {}\nName: {}\nDate: {}\nSize: {}\nHash: {}\n",
        record.file_id,
        record.path,
        record.name,
        record.timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.size,
        record.hash,
    )
    .into_response()
}
