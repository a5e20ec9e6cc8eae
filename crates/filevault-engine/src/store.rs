//! Filesystem-backed vault implementation.
//!
//! Layout under the store root:
//! - `objects/<h0h1>/<rest>` — content blobs, named by SHA-256
//! - `index.json` — file records and the id counter

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::record::{Entry, FileId, FileRecord};
use crate::{Vault, VaultError};

const INDEX_FILE: &str = "index.json";
const OBJECTS_DIR: &str = "objects";

#[derive(Debug, Serialize, Deserialize)]
struct Index {
    next_id: FileId,
    records: BTreeMap<FileId, FileRecord>,
}

impl Default for Index {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }
}

/// Content-addressed store rooted at a single directory.
///
/// Identical content is stored once; every import gets its own record keyed
/// by an ascending file id. Safe for concurrent use: the index lives behind
/// an `RwLock` and is rewritten atomically on mutation.
pub struct FileVault {
    root: PathBuf,
    index: RwLock<Index>,
}

impl FileVault {
    /// Open (or initialize) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, VaultError> {
        let root = root.into();
        fs::create_dir_all(root.join(OBJECTS_DIR)).await?;

        let index_path = root.join(INDEX_FILE);
        let index = if fs::try_exists(&index_path).await? {
            let content = fs::read_to_string(&index_path).await?;
            serde_json::from_str(&content).map_err(|e| VaultError::Index(e.to_string()))?
        } else {
            Index::default()
        };
        tracing::info!(
            "Opened vault at {:?} with {} file(s)",
            root,
            index.records.len()
        );

        Ok(Self {
            root,
            index: RwLock::new(index),
        })
    }

    fn object_path(&self, hash: &str) -> PathBuf {
        let (fanout, rest) = hash.split_at(2.min(hash.len()));
        self.root.join(OBJECTS_DIR).join(fanout).join(rest)
    }

    fn lookup(&self, file_id: FileId) -> Result<FileRecord, VaultError> {
        let index = self.index.read().unwrap();
        index
            .records
            .get(&file_id)
            .cloned()
            .ok_or(VaultError::NotFound(file_id))
    }

    async fn save_index(&self) -> Result<(), VaultError> {
        let content = {
            let index = self.index.read().unwrap();
            serde_json::to_string_pretty(&*index).map_err(|e| VaultError::Index(e.to_string()))?
        };
        atomic_write(&self.root.join(INDEX_FILE), content.as_bytes()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Vault for FileVault {
    async fn check(&self) -> Result<Vec<String>, VaultError> {
        let records: Vec<FileRecord> = {
            let index = self.index.read().unwrap();
            index.records.values().cloned().collect()
        };

        let mut report = Vec::new();
        for record in records {
            let object = self.object_path(&record.hash);
            match fs::metadata(&object).await {
                Ok(meta) if meta.len() != record.size => report.push(format!(
                    "file {}: size mismatch for {} (index {}, object {})",
                    record.file_id,
                    record.path,
                    record.size,
                    meta.len()
                )),
                Ok(_) => {}
                Err(_) => report.push(format!(
                    "file {}: missing object {}",
                    record.file_id, record.hash
                )),
            }
        }
        Ok(report)
    }

    async fn import(
        &self,
        local: &Path,
        name: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<FileId, VaultError> {
        let (hash, size) = hash_file(local).await?;

        {
            let index = self.index.read().unwrap();
            if let Some(existing) = index
                .records
                .values()
                .find(|r| r.hash == hash && r.path == name)
            {
                return Err(VaultError::Exists {
                    file_id: existing.file_id,
                });
            }
        }

        let object = self.object_path(&hash);
        if !fs::try_exists(&object).await? {
            if let Some(parent) = object.parent() {
                fs::create_dir_all(parent).await?;
            }
            let staged = object.with_extension(format!("{}.tmp", random_hex()));
            if let Err(e) = fs::copy(local, &staged).await {
                let _ = fs::remove_file(&staged).await;
                return Err(e.into());
            }
            if let Err(e) = fs::rename(&staged, &object).await {
                let _ = fs::remove_file(&staged).await;
                return Err(e.into());
            }
        }

        let record = {
            let mut index = self.index.write().unwrap();
            let file_id = index.next_id;
            index.next_id += 1;
            let record = FileRecord {
                file_id,
                path: name.to_string(),
                name: basename(name),
                timestamp,
                size,
                hash,
            };
            index.records.insert(file_id, record.clone());
            record
        };
        self.save_index().await?;

        tracing::debug!("Imported {} as file {}", record.path, record.file_id);
        Ok(record.file_id)
    }

    async fn extract(&self, file_id: FileId, dest: &Path) -> Result<u64, VaultError> {
        let record = self.lookup(file_id)?;
        let bytes = fs::copy(self.object_path(&record.hash), dest).await?;
        Ok(bytes)
    }

    async fn info(&self, file_id: FileId) -> Result<FileRecord, VaultError> {
        self.lookup(file_id)
    }

    async fn list_path(&self, path: &str) -> Result<Vec<Entry>, VaultError> {
        let index = self.index.read().unwrap();
        Ok(index
            .records
            .values()
            .filter(|r| r.path.starts_with(path))
            .map(|r| Entry {
                file_id: r.file_id,
                path: r.path.clone(),
            })
            .collect())
    }

    async fn list_hash(&self, hash: &str) -> Result<Vec<Entry>, VaultError> {
        let index = self.index.read().unwrap();
        Ok(index
            .records
            .values()
            .filter(|r| r.hash == hash)
            .map(|r| Entry {
                file_id: r.file_id,
                path: r.path.clone(),
            })
            .collect())
    }

    async fn query(&self, terms: &str) -> Result<Vec<Entry>, VaultError> {
        let terms: Vec<String> = terms.split_whitespace().map(str::to_lowercase).collect();
        let index = self.index.read().unwrap();
        Ok(index
            .records
            .values()
            .filter(|r| {
                let path = r.path.to_lowercase();
                terms.iter().all(|t| path.contains(t))
            })
            .map(|r| Entry {
                file_id: r.file_id,
                path: r.path.clone(),
            })
            .collect())
    }

    async fn query_filename(&self, name: &str) -> Result<Vec<FileId>, VaultError> {
        let index = self.index.read().unwrap();
        Ok(index
            .records
            .values()
            .filter(|r| r.path == name)
            .map(|r| r.file_id)
            .collect())
    }
}

/// Final path component of a vault path.
fn basename(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// Random hex string for temp-file names.
fn random_hex() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Streaming SHA-256 of a file, returning the hash and size.
async fn hash_file(path: &Path) -> Result<(String, u64), std::io::Error> {
    let mut file = fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    let mut size = 0u64;
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }
    Ok((hex::encode(hasher.finalize()), size))
}

/// Atomic write using temp file + rename.
async fn atomic_write(path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
    let temp = path.with_extension(format!("{}.tmp", random_hex()));

    if let Err(e) = fs::write(&temp, content).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e);
    }
    if let Err(e) = fs::rename(&temp, path).await {
        let _ = fs::remove_file(&temp).await;
        return Err(e);
    }
    Ok(())
}
