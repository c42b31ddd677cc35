// src/db/helpers.rs

use crate::db::Database;
use crate::error::AppError;
use rusqlite::{Connection, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

/// Lock the shared database, recovering from poisoning if necessary.
pub fn lock_db<'a>(db: &'a Arc<Mutex<Database>>, operation: &str) -> MutexGuard<'a, Database> {
    match db.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("Database mutex was poisoned during {operation}, recovering");
            poisoned.into_inner()
        }
    }
}

fn log_failure(operation: &str, e: &AppError) {
    if let AppError::Database(db_err) = e {
        log::error!("Failed to {operation}: {db_err}");
    } else {
        log::debug!("Rejected {operation}: {e}");
    }
}

/// Run a read (or single-statement write) against the shared connection.
///
/// # Example
/// ```ignore
/// with_connection(&db, "load categories", |conn| {
///     Ok(Category::find_all(conn)?)
/// })
/// ```
pub fn with_connection<F, T>(
    db: &Arc<Mutex<Database>>,
    operation: &str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce(&Connection) -> Result<T, AppError>,
{
    let db = lock_db(db, operation);
    f(db.connection()).inspect_err(|e| log_failure(operation, e))
}

/// Run `f` inside one IMMEDIATE transaction; commits on `Ok`, rolls back on `Err`.
///
/// Every check-then-write sequence (existence, lifecycle guard, weight budget) goes
/// through here so concurrent writers against the same plan serialize.
pub fn with_transaction<F, T>(
    db: &Arc<Mutex<Database>>,
    operation: &str,
    f: F,
) -> Result<T, AppError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, AppError>,
{
    let mut db = lock_db(db, operation);
    let run = |db: &mut Database| -> Result<T, AppError> {
        let tx = db.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    };
    run(&mut *db).inspect_err(|e| log_failure(operation, e))
}
