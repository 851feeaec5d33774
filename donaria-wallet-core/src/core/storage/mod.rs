//! Vault record storage
//!
//! This module contains the record stores behind `VaultRepository`: an
//! in-memory store for tests and embedding, and a file store that keeps one
//! JSON document per owner.
//!
//! SECURITY: records hold only the sealed envelope and the public identity.
//! Files are written with owner-only permissions (0600) and replaced
//! atomically via a temp file and rename.

use crate::domain::entities::WalletVaultRecord;
use crate::domain::repositories::VaultRepository;
use crate::shared::error::WalletError;
use crate::shared::utils::sha256_hash;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

fn ensure_owner(owner_id: &str) -> Result<(), WalletError> {
    if owner_id.trim().is_empty() {
        return Err(WalletError::validation("Owner id cannot be empty"));
    }
    Ok(())
}

/// In-memory vault store
#[derive(Default)]
pub struct InMemoryVaultStore {
    records: RwLock<HashMap<String, WalletVaultRecord>>,
}

impl InMemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VaultRepository for InMemoryVaultStore {
    async fn get(&self, owner_id: &str) -> Result<Option<WalletVaultRecord>, WalletError> {
        ensure_owner(owner_id)?;
        Ok(self.records.read().await.get(owner_id).cloned())
    }

    async fn put(&self, owner_id: &str, record: &WalletVaultRecord) -> Result<(), WalletError> {
        ensure_owner(owner_id)?;
        self.records
            .write()
            .await
            .insert(owner_id.to_string(), record.clone());
        Ok(())
    }
}

/// File-backed vault store, one JSON file per owner
pub struct FileVaultStore {
    dir: PathBuf,
}

impl FileVaultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of an owner's record. The owner id is hashed so it never appears
    /// in a filename.
    pub fn record_path(&self, owner_id: &str) -> PathBuf {
        let hash = hex::encode(sha256_hash(owner_id.as_bytes()));
        self.dir.join(format!("{}.json", &hash[..32]))
    }

    async fn ensure_dir(&self) -> Result<(), WalletError> {
        fs::create_dir_all(&self.dir).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, std::fs::Permissions::from_mode(0o700)).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl VaultRepository for FileVaultStore {
    async fn get(&self, owner_id: &str) -> Result<Option<WalletVaultRecord>, WalletError> {
        ensure_owner(owner_id)?;
        let path = self.record_path(owner_id);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: WalletVaultRecord = serde_json::from_slice(&bytes)?;
        if record.owner_id != owner_id {
            return Err(WalletError::storage(format!(
                "Record at {} belongs to a different owner",
                path.display()
            )));
        }
        Ok(Some(record))
    }

    async fn put(&self, owner_id: &str, record: &WalletVaultRecord) -> Result<(), WalletError> {
        ensure_owner(owner_id)?;
        if record.owner_id != owner_id {
            return Err(WalletError::validation("Record owner does not match key"));
        }
        self.ensure_dir().await?;

        let path = self.record_path(owner_id);
        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(record)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&tmp_path).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &path).await?;
        log::debug!("Vault record written to {}", path.display());
        Ok(())
    }
}
