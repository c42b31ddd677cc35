use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::Serialize;

/// A supporting file attached to an achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evidence {
    pub id: i64,
    pub achievement_id: i64,
    pub file_name: String,
    /// Key of the object in the evidence store.
    pub storage_path: String,
    pub file_url: String,
    pub description: Option<String>,
}

const COLUMNS: &str = "id, achievement_id, file_name, storage_path, file_url, description";

impl Evidence {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            achievement_id: row.get(1)?,
            file_name: row.get(2)?,
            storage_path: row.get(3)?,
            file_url: row.get(4)?,
            description: row.get(5)?,
        })
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM evidences WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_by_achievement(conn: &Connection, achievement_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM evidences WHERE achievement_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![achievement_id], Self::from_row)?;
        rows.collect()
    }

    /// Storage keys of every evidence object under a plan.
    pub fn storage_paths_for_plan(conn: &Connection, plan_id: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT e.storage_path
             FROM evidences e
             JOIN achievements a ON e.achievement_id = a.id
             JOIN activities act ON a.activity_id = act.id
             WHERE act.plan_id = ?1",
        )?;
        let rows = stmt.query_map(params![plan_id], |row| row.get(0))?;
        rows.collect()
    }

    /// Storage keys of every evidence object under an activity.
    pub fn storage_paths_for_activity(conn: &Connection, activity_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT e.storage_path
             FROM evidences e
             JOIN achievements a ON e.achievement_id = a.id
             WHERE a.activity_id = ?1",
        )?;
        let rows = stmt.query_map(params![activity_id], |row| row.get(0))?;
        rows.collect()
    }

    pub fn create(
        conn: &Connection,
        achievement_id: i64,
        file_name: &str,
        storage_path: &str,
        file_url: &str,
        description: Option<&str>,
    ) -> Result<Self> {
        conn.execute(
            "INSERT INTO evidences (achievement_id, file_name, storage_path, file_url, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![achievement_id, file_name, storage_path, file_url, description],
        )?;
        Ok(Self {
            id: conn.last_insert_rowid(),
            achievement_id,
            file_name: file_name.to_string(),
            storage_path: storage_path.to_string(),
            file_url: file_url.to_string(),
            description: description.map(str::to_string),
        })
    }

    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE evidences SET file_name = ?1, storage_path = ?2, file_url = ?3, description = ?4
             WHERE id = ?5",
            params![self.file_name, self.storage_path, self.file_url, self.description, self.id],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM evidences WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Achievement, Activity, ActivityCategory};
    use crate::test_utils::{activity, seed_plan, setup_test_db};

    #[test]
    fn test_evidence_crud_and_paths() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        seed_plan(conn, "IPP-1");
        let a = Activity::create(conn, "IPP-1", &activity("A", ActivityCategory::Routine, 30.0)).unwrap();
        Achievement::create_for_plan(conn, "IPP-1").unwrap();
        let jan = Achievement::find_by_activity_and_month(conn, a.id, 1).unwrap().unwrap();

        let mut ev = Evidence::create(conn, jan.id, "report.pdf", "evidence/1/report.pdf", "file:///tmp/report.pdf", None).unwrap();
        assert_eq!(Evidence::find_by_achievement(conn, jan.id).unwrap(), vec![ev.clone()]);
        assert_eq!(Evidence::storage_paths_for_plan(conn, "IPP-1").unwrap(), vec!["evidence/1/report.pdf".to_string()]);
        assert_eq!(Evidence::storage_paths_for_activity(conn, a.id).unwrap().len(), 1);

        ev.description = Some("signed".into());
        assert!(ev.update(conn).unwrap());
        assert_eq!(Evidence::find_by_id(conn, ev.id).unwrap().unwrap().description.as_deref(), Some("signed"));

        assert!(Evidence::delete(conn, ev.id).unwrap());
        assert!(Evidence::find_by_id(conn, ev.id).unwrap().is_none());
    }
}
