//! Evidence files attached to achievements.
//!
//! Blob operations run outside the database lock. Upload happens before the record is
//! written so a failed upload leaves nothing behind; removal happens after the record is
//! gone so a failed removal only leaves an orphaned blob.

use crate::db::{with_connection, with_transaction, Database};
use crate::error::AppError;
use crate::models::{Achievement, Evidence};
use crate::storage::{evidence_path, remove_best_effort, remove_failed, upload_failed, EvidenceStore, StorageError};
use crate::validation::validate_file_name;
use log::{info, warn};
use std::sync::{Arc, Mutex};

use super::require_achievement;

/// A file submitted as evidence.
#[derive(Debug, Clone)]
pub struct EvidenceFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

pub struct EvidenceManager {
    db: Arc<Mutex<Database>>,
    store: Arc<dyn EvidenceStore>,
}

fn require_evidence(conn: &rusqlite::Connection, id: i64) -> Result<Evidence, AppError> {
    Evidence::find_by_id(conn, id)?.ok_or_else(|| AppError::not_found("Evidence", id))
}

impl EvidenceManager {
    pub fn new(db: Arc<Mutex<Database>>, store: Arc<dyn EvidenceStore>) -> Self {
        Self { db, store }
    }

    pub fn list_by_achievement(
        &self,
        plan_id: &str,
        activity_name: &str,
        month: u8,
    ) -> Result<Vec<Evidence>, AppError> {
        with_connection(&self.db, "load evidence", |conn| {
            let (_, achievement) = require_achievement(conn, plan_id, activity_name, month)?;
            Ok(Evidence::find_by_achievement(conn, achievement.id)?)
        })
    }

    pub fn find_by_id(&self, id: i64) -> Result<Evidence, AppError> {
        with_connection(&self.db, "load evidence", |conn| require_evidence(conn, id))
    }

    pub fn create(
        &self,
        plan_id: &str,
        activity_name: &str,
        month: u8,
        file: &EvidenceFile,
        description: Option<&str>,
    ) -> Result<Evidence, AppError> {
        let file_name = validate_file_name(&file.file_name)?;
        let achievement = with_connection(&self.db, "load achievement", |conn| {
            require_achievement(conn, plan_id, activity_name, month).map(|(_, a)| a)
        })?;

        let path = evidence_path(achievement.id, file_name);
        let stored = self.store.upload(&path, &file.content).map_err(|e| upload_failed(&e))?;

        let created = with_transaction(&self.db, "create evidence", |tx| {
            if Achievement::find_by_id(tx, achievement.id)?.is_none() {
                return Err(AppError::not_found("Achievement", achievement.id));
            }
            Ok(Evidence::create(tx, achievement.id, file_name, &stored.path, &stored.url, description)?)
        });
        if created.is_err() {
            remove_best_effort(self.store.as_ref(), &[stored.path]);
        }

        let evidence = created?;
        info!("Attached evidence '{}' to achievement {}", evidence.file_name, achievement.id);
        Ok(evidence)
    }

    /// Replace the file and/or description. A replacement file removes the old object,
    /// stores the new one, then updates the record.
    pub fn update(&self, id: i64, file: Option<&EvidenceFile>, description: Option<&str>) -> Result<Evidence, AppError> {
        let mut evidence = self.find_by_id(id)?;

        if let Some(file) = file {
            let file_name = validate_file_name(&file.file_name)?;
            match self.store.remove(&evidence.storage_path) {
                Ok(()) => {}
                Err(StorageError::Missing(path)) => {
                    warn!("Evidence object '{path}' was already gone, replacing anyway");
                }
                Err(e) => return Err(remove_failed(&e)),
            }

            let path = evidence_path(evidence.achievement_id, file_name);
            let stored = self.store.upload(&path, &file.content).map_err(|e| {
                warn!("Evidence {id} now points at removed object '{}'", evidence.storage_path);
                upload_failed(&e)
            })?;
            evidence.file_name = file_name.to_string();
            evidence.storage_path = stored.path;
            evidence.file_url = stored.url;
        }
        if let Some(description) = description {
            evidence.description = Some(description.to_string());
        }

        with_transaction(&self.db, "update evidence", |tx| {
            if !evidence.update(tx)? {
                return Err(AppError::not_found("Evidence", id));
            }
            Ok(())
        })?;
        Ok(evidence)
    }

    /// Delete the record; the stored object is removed best-effort afterwards.
    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        let evidence = with_transaction(&self.db, "delete evidence", |tx| {
            let evidence = require_evidence(tx, id)?;
            Evidence::delete(tx, id)?;
            Ok(evidence)
        })?;

        remove_best_effort(self.store.as_ref(), &[evidence.storage_path]);
        Ok(())
    }
}
