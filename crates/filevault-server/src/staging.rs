//! Session-scoped temporary files with guaranteed cleanup.

use std::path::{Path, PathBuf};

use crate::session::Session;

/// Allocates staged temp files under the configured temp directory.
#[derive(Debug, Clone)]
pub struct Staging {
    temp_dir: PathBuf,
}

impl Staging {
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// Allocate the staged path for one request. `suffix` distinguishes the
    /// purpose: the display-name extension for extraction, `_import` for
    /// uploads.
    pub fn allocate(&self, session: &Session, suffix: &str) -> StagedFile {
        StagedFile {
            path: self.temp_dir.join(format!("{}{}", session.id(), suffix)),
        }
    }
}

/// A temp file owned by one request.
///
/// The file is removed when the handle drops — on success, on engine
/// failure, and when the client goes away mid-stream. Handlers never issue
/// cleanup calls of their own.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Failed to remove staged file {:?}: {}", self.path, e);
            }
        }
    }
}

/// Staging suffix for an extraction: the display name's extension.
pub fn extension_suffix(name: &str) -> String {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(".{ext}"),
        None => String::new(),
    }
}
