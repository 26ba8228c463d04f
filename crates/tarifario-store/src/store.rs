//! Persistence trait and its filesystem implementation
//!
//! The form core never touches storage directly; it talks to a
//! [`ContractStore`]. [`FileStore`] keeps rendered documents and the
//! executive roster under a root directory, one file per entry.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// One sales executive of the roster, addressable by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executive {
    /// Full name, as printed into the contract's EJECUTIVO field
    pub name: String,
    /// Branch office the executive works from
    #[serde(default)]
    pub branch: String,
}

impl Executive {
    /// Create an executive record
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
        }
    }
}

/// Async persistence seam for rendered contracts and the executive roster
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Persist a rendered document under a name
    async fn put_document(&self, name: &str, document: &[u8]) -> Result<(), StoreError>;

    /// Fetch a stored document; `None` when absent
    async fn get_document(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace an executive record
    async fn put_executive(&self, executive: &Executive) -> Result<(), StoreError>;

    /// Fetch an executive by name; `None` when absent
    async fn get_executive(&self, name: &str) -> Result<Option<Executive>, StoreError>;

    /// Remove an executive. Removing an absent record is not an error.
    async fn delete_executive(&self, name: &str) -> Result<(), StoreError>;

    /// List the roster, sorted by name
    async fn list_executives(&self) -> Result<Vec<Executive>, StoreError>;
}

/// File-per-entry store rooted at a directory.
///
/// Documents land under `documents/`, executive records under
/// `executives/` as JSON. Keys become file names, so path separators and
/// traversal are rejected up front.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store at `root`, creating the directory layout
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(root.join("documents")).await?;
        fs::create_dir_all(root.join("executives")).await?;
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    /// The store's root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, dir: &str, key: &str, ext: &str) -> Result<PathBuf, StoreError> {
        if key.trim().is_empty()
            || key.contains(['/', '\\'])
            || key == "."
            || key == ".."
        {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(dir).join(format!("{key}{ext}")))
    }

    async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ContractStore for FileStore {
    async fn put_document(&self, name: &str, document: &[u8]) -> Result<(), StoreError> {
        let path = self.entry_path("documents", name, "")?;
        fs::write(&path, document).await?;
        tracing::debug!(%name, bytes = document.len(), "stored document");
        Ok(())
    }

    async fn get_document(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.entry_path("documents", name, "")?;
        Self::read_optional(&path).await
    }

    async fn put_executive(&self, executive: &Executive) -> Result<(), StoreError> {
        let path = self.entry_path("executives", &executive.name, ".json")?;
        let json = serde_json::to_vec_pretty(executive)?;
        fs::write(&path, json).await?;
        tracing::debug!(name = %executive.name, "stored executive");
        Ok(())
    }

    async fn get_executive(&self, name: &str) -> Result<Option<Executive>, StoreError> {
        let path = self.entry_path("executives", name, ".json")?;
        match Self::read_optional(&path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn delete_executive(&self, name: &str) -> Result<(), StoreError> {
        let path = self.entry_path("executives", name, ".json")?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_executives(&self) -> Result<Vec<Executive>, StoreError> {
        let mut executives = Vec::new();
        let mut entries = fs::read_dir(self.root.join("executives")).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let bytes = fs::read(entry.path()).await?;
            executives.push(serde_json::from_slice(&bytes)?);
        }
        executives.sort_by(|a: &Executive, b: &Executive| a.name.cmp(&b.name));
        Ok(executives)
    }
}
