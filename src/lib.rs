pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod host;
pub mod models;
pub mod services;
pub mod storage;
#[cfg(test)]
mod test_utils;
pub mod validation;
pub mod weights;

use crate::config::Config;
use crate::db::{migrations, Database};
use crate::services::{
    AchievementManager, ActivityManager, CategoryManager, DirectoryManager, EvidenceManager, PlanManager,
    SummaryManager,
};
use crate::storage::{EvidenceStore, FsEvidenceStore};
use log::info;
use std::sync::{Arc, Mutex};

/// Every manager, wired to one database and one evidence store.
pub struct IppApp {
    pub categories: CategoryManager,
    pub directory: DirectoryManager,
    pub plans: PlanManager,
    pub activities: ActivityManager,
    pub achievements: AchievementManager,
    pub evidence: EvidenceManager,
    pub summary: SummaryManager,
}

impl IppApp {
    pub fn new(db: Arc<Mutex<Database>>, store: Arc<dyn EvidenceStore>) -> Self {
        Self {
            categories: CategoryManager::new(Arc::clone(&db)),
            directory: DirectoryManager::new(Arc::clone(&db)),
            plans: PlanManager::new(Arc::clone(&db), Arc::clone(&store)),
            activities: ActivityManager::new(Arc::clone(&db), Arc::clone(&store)),
            achievements: AchievementManager::new(Arc::clone(&db)),
            evidence: EvidenceManager::new(Arc::clone(&db), store),
            summary: SummaryManager::new(db),
        }
    }
}

/// Error type for startup failures
#[derive(Debug)]
pub enum InitError {
    NoProjectDirs,
    DataDirCreation(std::io::Error),
    DatabaseOpen(rusqlite::Error),
    Migration(rusqlite::Error),
    EvidenceStore(std::io::Error),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::NoProjectDirs => write!(f, "Could not determine project directories"),
            InitError::DataDirCreation(e) => write!(f, "Could not create data directory: {e}"),
            InitError::DatabaseOpen(e) => write!(f, "Failed to open database: {e}"),
            InitError::Migration(e) => write!(f, "Failed to run database migrations: {e}"),
            InitError::EvidenceStore(e) => write!(f, "Failed to prepare evidence directory: {e}"),
        }
    }
}

impl std::error::Error for InitError {}

/// Open the database, apply migrations and wire up the managers.
pub fn init(config: &Config) -> Result<IppApp, InitError> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).map_err(InitError::DataDirCreation)?;
    }

    let db = Database::open(&config.database_path).map_err(InitError::DatabaseOpen)?;
    migrations::run(db.connection()).map_err(InitError::Migration)?;
    let store = FsEvidenceStore::new(config.evidence_dir.clone()).map_err(InitError::EvidenceStore)?;

    info!(
        "Opened {} with evidence under {}",
        config.database_path.display(),
        store.root().display()
    );
    Ok(IppApp::new(Arc::new(Mutex::new(db)), Arc::new(store)))
}
