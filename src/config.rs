use directories::ProjectDirs;
use std::path::PathBuf;

use crate::InitError;

pub const DATABASE_PATH_ENV: &str = "IPP_DATABASE_PATH";
pub const EVIDENCE_DIR_ENV: &str = "IPP_EVIDENCE_DIR";

/// Where the database and evidence files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub evidence_dir: PathBuf,
}

impl Config {
    /// Both paths below one data directory: `ipp.db` and `evidence/`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            database_path: data_dir.join("ipp.db"),
            evidence_dir: data_dir.join("evidence"),
        }
    }

    /// Resolve from `IPP_DATABASE_PATH` / `IPP_EVIDENCE_DIR`, falling back to the
    /// platform data directory for whichever is unset.
    pub fn from_env() -> Result<Self, InitError> {
        Self::resolve(
            std::env::var_os(DATABASE_PATH_ENV).map(PathBuf::from),
            std::env::var_os(EVIDENCE_DIR_ENV).map(PathBuf::from),
        )
    }

    fn resolve(database_path: Option<PathBuf>, evidence_dir: Option<PathBuf>) -> Result<Self, InitError> {
        if let (Some(database_path), Some(evidence_dir)) = (&database_path, &evidence_dir) {
            return Ok(Self {
                database_path: database_path.clone(),
                evidence_dir: evidence_dir.clone(),
            });
        }

        let proj_dirs = ProjectDirs::from("com", "ipp", "IppTracker").ok_or(InitError::NoProjectDirs)?;
        let defaults = Self::in_dir(proj_dirs.data_dir());
        Ok(Self {
            database_path: database_path.unwrap_or(defaults.database_path),
            evidence_dir: evidence_dir.unwrap_or(defaults.evidence_dir),
        })
    }
}
