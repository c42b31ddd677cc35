//! Blob storage for evidence files.
//!
//! The database record is authoritative; blobs are written before a record is created and
//! removed after a record is deleted. A blob that outlives its record, or a record whose
//! blob went missing, is repairable and never blocks the core workflow.

use crate::constants::EVIDENCE_PREFIX;
use crate::error::AppError;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage path '{0}'")]
    InvalidPath(String),

    #[error("object '{0}' not found")]
    Missing(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Backend(String),
}

/// Where an uploaded object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Store-relative key, e.g. `evidence/42/<uuid>-report.pdf`.
    pub path: String,
    /// Location clients can fetch the object from.
    pub url: String,
}

pub trait EvidenceStore: Send + Sync {
    fn upload(&self, path: &str, content: &[u8]) -> Result<StoredObject, StorageError>;

    fn remove(&self, path: &str) -> Result<(), StorageError>;
}

/// Fresh key for an evidence file: one namespace per achievement, one object per upload.
/// Two records never share an object, even when their file names match.
pub fn evidence_path(achievement_id: i64, file_name: &str) -> String {
    format!("{EVIDENCE_PREFIX}/{achievement_id}/{}-{file_name}", Uuid::new_v4())
}

/// Remove objects whose records are already gone; failures are logged and skipped.
pub fn remove_best_effort(store: &dyn EvidenceStore, paths: &[String]) {
    for path in paths {
        if let Err(e) = store.remove(path) {
            log::warn!("Failed to remove evidence object '{path}', leaving it orphaned: {e}");
        }
    }
}

pub(crate) fn upload_failed(e: &StorageError) -> AppError {
    AppError::DependencyFailure {
        operation: "upload evidence file",
        reason: e.to_string(),
    }
}

pub(crate) fn remove_failed(e: &StorageError) -> AppError {
    AppError::DependencyFailure {
        operation: "remove evidence file",
        reason: e.to_string(),
    }
}

/// Stores objects as plain files below a root directory.
pub struct FsEvidenceStore {
    root: PathBuf,
}

impl FsEvidenceStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root: root.canonicalize()? })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a store key below the root, refusing anything that could escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !only_normal {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl EvidenceStore for FsEvidenceStore {
    fn upload(&self, path: &str, content: &[u8]) -> Result<StoredObject, StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;

        let url = Url::from_file_path(&target)
            .map_err(|()| StorageError::InvalidPath(target.display().to_string()))?;
        log::debug!("Stored evidence object '{path}' ({} bytes)", content.len());
        Ok(StoredObject {
            path: path.to_string(),
            url: url.to_string(),
        })
    }

    fn remove(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::Missing(path.to_string())),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_evidence_path_is_namespaced_and_unique() {
        let first = evidence_path(42, "report.pdf");
        let second = evidence_path(42, "report.pdf");
        assert!(first.starts_with("evidence/42/"));
        assert!(first.ends_with("-report.pdf"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_upload_and_remove() {
        let dir = tempdir().unwrap();
        let store = FsEvidenceStore::new(dir.path().join("blobs")).unwrap();

        let stored = store.upload("evidence/1/report.pdf", b"%PDF").unwrap();
        assert_eq!(stored.path, "evidence/1/report.pdf");
        assert!(stored.url.starts_with("file://"));
        assert!(stored.url.ends_with("evidence/1/report.pdf"));
        let on_disk = store.root().join("evidence/1/report.pdf");
        assert_eq!(fs::read(&on_disk).unwrap(), b"%PDF");

        store.remove("evidence/1/report.pdf").unwrap();
        assert!(!on_disk.exists());
        assert!(matches!(
            store.remove("evidence/1/report.pdf"),
            Err(StorageError::Missing(_))
        ));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        let store = FsEvidenceStore::new(dir.path()).unwrap();
        assert!(matches!(store.upload("../outside", b"x"), Err(StorageError::InvalidPath(_))));
        assert!(matches!(store.upload("/abs/path", b"x"), Err(StorageError::InvalidPath(_))));
        assert!(matches!(store.remove(""), Err(StorageError::InvalidPath(_))));
    }
}
