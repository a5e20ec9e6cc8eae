//! `extract`: two-phase staged delivery of file content.
//!
//! The first pass redirects so the display name lands in the final path
//! segment (client-side content sniffing and save-as depend on it); the
//! second pass stages the bytes into a session temp file and sends them
//! back with an inferred content type. Engine failure detail is not leaked:
//! everything past authorization renders as plain `Not Found`.

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Redirect, Response};

use super::{Params, bad_request, not_found, unauthorized};
use crate::AppState;
use crate::session::Session;
use crate::staging::extension_suffix;

pub async fn handle(
    state: &AppState,
    auth: &str,
    params: &Params,
    trailing: Option<String>,
    session: &Session,
) -> Response {
    let fid = params.get("f").cloned().unwrap_or_default();
    let grant = state.auth.authorize(auth, &format!("extract {fid}"));
    if grant.is_denied() {
        return unauthorized();
    }
    if fid.is_empty() {
        return bad_request("No file_id specified.");
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

    let name = match params.get("name") {
        Some(name) if !name.is_empty() => name.clone(),
        _ => record.name.clone(),
    };

    // Phase one: put the display name in the final path segment.
    if trailing.as_deref() != Some(name.as_str()) {
        let location = format!(
            "/extract/{}?auth={}&f={}&name={}",
            urlencoding::encode(&name),
            urlencoding::encode(auth),
            fid,
            urlencoding::encode(&name),
        );
        return Redirect::temporary(&location).into_response();
    }

    // Phase two: stage, infer, deliver. The staged handle cleans up on
    // every path out of this function.
    let staged = state.staging.allocate(session, &extension_suffix(&name));
    if let Err(e) = state.vault.extract(file_id, staged.path()).await {
        tracing::warn!("Extraction of file {} failed: {}", file_id, e);
        return not_found();
    }
    let Some(mime_type) = mime_guess::from_path(staged.path()).first_raw() else {
        return not_found();
    };
    let bytes = match tokio::fs::read(staged.path()).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read staged file {:?}: {}", staged.path(), e);
            return not_found();
        }
    };

    ([(CONTENT_TYPE, mime_type)], bytes).into_response()
}
