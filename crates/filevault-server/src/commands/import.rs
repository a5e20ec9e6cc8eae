//! `import`: staged multipart upload into the vault.
//!
//! The upload is streamed to a session temp file before the token is
//! validated (the signing context needs the `fn` form field, which may
//! arrive after the file part). The staged handle cleans the temp file up
//! on every branch out of here, including validation failures.

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use chrono::{NaiveDateTime, Utc};
use tokio::io::AsyncWriteExt;

use filevault_engine::VaultError;

use super::{bad_request, internal_error, unauthorized};
use crate::AppState;
use crate::render;
use crate::session::Session;

pub async fn handle(state: &AppState, auth: &str, session: &Session, request: Request) -> Response {
    if request.method() != Method::POST {
        return bad_request("No file uploaded.");
    }
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(_) => return bad_request("No file uploaded."),
    };

    let staged = state.staging.allocate(session, "_import");
    let mut staged_upload = false;
    let mut filename = String::new();
    let mut ts_field = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return bad_request("No file uploaded."),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if let Err(e) = stage_upload(field, staged.path()).await {
                    tracing::error!("Failed to stage upload: {}", e);
                    return internal_error(e.to_string());
                }
                staged_upload = true;
            }
            Some("fn") => filename = field.text().await.unwrap_or_default(),
            Some("ts") => ts_field = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }
    if !staged_upload {
        return bad_request("No file uploaded.");
    }

    let grant = state.auth.authorize(auth, &format!("import {filename}"));
    if grant.is_denied() || !grant.can_write {
        return unauthorized();
    }
    if filename.is_empty() {
        return bad_request("No filename specified.");
    }
    if !grant.contains(&filename) {
        return unauthorized();
    }

    let timestamp = if ts_field.is_empty() {
        Utc::now()
    } else {
        match NaiveDateTime::parse_from_str(&ts_field, "%Y-%m-%d %H:%M:%S") {
            Ok(naive) => naive.and_utc(),
            Err(_) => return bad_request("Invalid timestamp: Format must be YYYY-MM-DD HH:MM:SS"),
        }
    };

    match state.vault.import(staged.path(), &filename, timestamp).await {
        Ok(file_id) => render::row(file_id, &filename).into_response(),
        Err(VaultError::Exists { file_id }) => {
            render::existing_row(file_id, &filename).into_response()
        }
        Err(e) => {
            tracing::error!("Import of {} failed: {}", filename, e);
            internal_error(e.to_string())
        }
    }
}

/// Stream one multipart field to the staged path.
async fn stage_upload(mut field: Field<'_>, dest: &Path) -> anyhow::Result<()> {
    let mut file = tokio::fs::File::create(dest).await?;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
