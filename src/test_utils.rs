//! Shared test utilities.
//!
//! Common database setup, seed data and an in-memory evidence store with failure
//! injection used across test modules.

#![cfg(test)]

use crate::db::{migrations, Database};
use crate::models::{ActivityCategory, Category, NewActivity, NewCategory, NewPlan, Owner, Plan};
use crate::storage::{EvidenceStore, StorageError, StoredObject};
use crate::IppApp;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

/// Same as [`setup_test_db`], wrapped the way managers share it.
pub fn setup_shared_db() -> (Arc<Mutex<Database>>, TempDir) {
    let (db, dir) = setup_test_db();
    (Arc::new(Mutex::new(db)), dir)
}

/// Fully wired app over a temp database and an in-memory evidence store.
pub fn setup_app() -> (IppApp, Arc<MemoryEvidenceStore>, TempDir) {
    let (db, dir) = setup_shared_db();
    {
        let guard = db.lock().expect("test db lock");
        seed_directory(guard.connection());
    }
    let store = Arc::new(MemoryEvidenceStore::default());
    let shared: Arc<dyn EvidenceStore> = Arc::<MemoryEvidenceStore>::clone(&store);
    let app = IppApp::new(db, shared);
    (app, store, dir)
}

/// Routine 60 / non-routine 30 / project 10.
pub fn staff_category() -> NewCategory {
    NewCategory {
        name: "Staff".into(),
        routine_budget: 60.0,
        non_routine_budget: 30.0,
        project_budget: 10.0,
    }
}

pub fn owner(id: &str) -> Owner {
    Owner {
        id: id.into(),
        name: format!("Employee {id}"),
        section: Some("Accounting".into()),
        position: Some("Analyst".into()),
        grade: Some(5),
        department_id: None,
    }
}

/// Ensure owner `E001` and the `Staff` category exist; returns the category id.
pub fn seed_directory(conn: &Connection) -> i64 {
    if !Owner::exists(conn, "E001").expect("owner lookup") {
        owner("E001").save(conn).expect("seed owner");
    }
    let existing = Category::find_all(conn)
        .expect("category lookup")
        .into_iter()
        .find(|c| c.name == "Staff");
    match existing {
        Some(category) => category.id,
        None => Category::create(conn, &staff_category()).expect("seed category").id,
    }
}

pub fn new_plan(id: &str, category_id: i64) -> NewPlan {
    NewPlan {
        id: id.into(),
        year: 2026,
        owner_id: "E001".into(),
        category_id,
    }
}

/// Insert a draft plan owned by `E001` in the `Staff` category.
pub fn seed_plan(conn: &Connection, id: &str) {
    let category_id = seed_directory(conn);
    Plan::new(&new_plan(id, category_id)).save(conn).expect("seed plan");
}

/// An activity with target "100".
pub fn activity(name: &str, category_tag: ActivityCategory, weight: f64) -> NewActivity {
    NewActivity {
        name: name.into(),
        category_tag,
        kpi: format!("{name} KPI"),
        weight,
        target: "100".into(),
        deliverable: format!("{name} deliverable"),
    }
}

/// Evidence store keeping objects in memory; uploads or removals can be made to fail.
#[derive(Default)]
pub struct MemoryEvidenceStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
    fail_removals: AtomicBool,
}

impl MemoryEvidenceStore {
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_removals(&self, fail: bool) {
        self.fail_removals.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().expect("store lock").contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().expect("store lock").get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().expect("store lock").len()
    }
}

impl EvidenceStore for MemoryEvidenceStore {
    fn upload(&self, path: &str, content: &[u8]) -> Result<StoredObject, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("upload refused".into()));
        }
        self.objects
            .lock()
            .expect("store lock")
            .insert(path.to_string(), content.to_vec());
        Ok(StoredObject {
            path: path.to_string(),
            url: format!("memory://{path}"),
        })
    }

    fn remove(&self, path: &str) -> Result<(), StorageError> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("remove refused".into()));
        }
        match self.objects.lock().expect("store lock").remove(path) {
            Some(_) => Ok(()),
            None => Err(StorageError::Missing(path.to_string())),
        }
    }
}
