//! Shared helpers for server integration tests.
//!
//! Builds a router over seeded credential stores and a real store in temp
//! directories, and drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tower::ServiceExt;

use filevault_engine::{FileId, FileVault, Vault};
use filevault_server::auth::{Authenticator, CredentialResolver};
use filevault_server::staging::Staging;
use filevault_server::{AppState, router};

/// A router wired to temp-dir state, plus handles for seeding and
/// inspection.
pub struct TestServer {
    pub app: Router,
    pub vault: Arc<FileVault>,
    /// Staging directory; checked for leftover temp files.
    pub temp_dir: TempDir,
    pub data_dir: TempDir,
    pub root_dir: TempDir,
}

/// Seeded identities:
/// - alice / secret — role editor, `/docs,rw`
/// - bob / hunter2 — role reader, `/docs` (no write)
/// - carol / pw — role admin, `/,rw`
pub async fn test_server() -> TestServer {
    let temp_dir = tempfile::tempdir().unwrap();
    let data_dir = tempfile::tempdir().unwrap();
    let root_dir = tempfile::tempdir().unwrap();

    seed_store(
        data_dir.path(),
        "passwords.json",
        &[("alice", "secret"), ("bob", "hunter2"), ("carol", "pw")],
    );
    seed_store(
        data_dir.path(),
        "user_roles.json",
        &[("alice", "editor"), ("bob", "reader"), ("carol", "admin")],
    );
    seed_store(
        data_dir.path(),
        "permissions.json",
        &[("editor", "/docs,rw"), ("reader", "/docs"), ("admin", "/,rw")],
    );

    let resolver = CredentialResolver::open(data_dir.path()).unwrap();
    let vault = Arc::new(FileVault::open(root_dir.path().join("store")).await.unwrap());

    let state = Arc::new(AppState {
        auth: Authenticator::new(resolver),
        vault: vault.clone(),
        staging: Staging::new(temp_dir.path()),
    });

    TestServer {
        app: router(state),
        vault,
        temp_dir,
        data_dir,
        root_dir,
    }
}

pub fn seed_store(dir: &Path, file: &str, entries: &[(&str, &str)]) {
    let map: HashMap<&str, &str> = entries.iter().copied().collect();
    std::fs::write(dir.join(file), serde_json::to_string_pretty(&map).unwrap()).unwrap();
}

/// Fixed timestamp used when seeding files, so rendered dates are stable.
pub fn seed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Import a file straight through the engine, bypassing the protocol.
pub async fn seed_file(server: &TestServer, path: &str, content: &[u8]) -> FileId {
    let src = server.root_dir.path().join("seed-src");
    std::fs::write(&src, content).unwrap();
    let id = server
        .vault
        .import(&src, path, seed_timestamp())
        .await
        .unwrap();
    std::fs::remove_file(&src).unwrap();
    id
}

pub fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Compute the signature for a signing context.
pub fn sign(context: &str, nonce: &str, password: &str) -> String {
    sha256_hex(format!("{context}{nonce}{password}").as_bytes())
}

/// Build an `identity/nonce/signature` capability token.
pub fn token(identity: &str, nonce: &str, context: &str, password: &str) -> String {
    format!("{}/{}/{}", identity, nonce, sign(context, nonce, password))
}

/// Issue a GET and collect the response.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

/// Issue a GET and return the raw response parts (status, content-type,
/// location, body bytes).
pub async fn get_raw(app: &Router, uri: &str) -> RawResponse {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    };
    let content_type = header("content-type");
    let location = header("location");
    let body = response.into_body().collect().await.unwrap().to_bytes();
    RawResponse {
        status,
        content_type,
        location,
        body: body.to_vec(),
    }
}

pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

const BOUNDARY: &str = "vault-test-boundary";

/// Build a multipart import request. Each part is optional so tests can
/// exercise missing-field behavior.
pub fn import_request(
    uri: &str,
    file: Option<&[u8]>,
    filename_field: Option<&str>,
    ts: Option<&str>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"upload.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(value) = filename_field {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"fn\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some(value) = ts {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"ts\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Send a prebuilt request and collect the response.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

/// Files currently sitting in the staging directory.
pub fn staged_files(server: &TestServer) -> Vec<PathBuf> {
    std::fs::read_dir(server.temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}
