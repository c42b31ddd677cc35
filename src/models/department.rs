use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

impl Department {
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            "SELECT id, name FROM departments WHERE id = ?1",
            params![id],
            |row| Ok(Self { id: row.get(0)?, name: row.get(1)? }),
        )
        .optional()
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name FROM departments ORDER BY name")?;
        let rows = stmt.query_map([], |row| Ok(Self { id: row.get(0)?, name: row.get(1)? }))?;
        rows.collect()
    }

    pub fn create(conn: &Connection, name: &str) -> Result<Self> {
        conn.execute("INSERT INTO departments (name) VALUES (?1)", params![name])?;
        Ok(Self { id: conn.last_insert_rowid(), name: name.to_string() })
    }

    pub fn rename(conn: &Connection, id: i64, name: &str) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE departments SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM departments WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_department_crud() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        let dept = Department::create(conn, "Finance").unwrap();
        assert!(Department::rename(conn, dept.id, "Accounting").unwrap());
        let found = Department::find_by_id(conn, dept.id).unwrap().unwrap();
        assert_eq!(found.name, "Accounting");
        assert_eq!(Department::find_all(conn).unwrap().len(), 1);

        assert!(Department::delete(conn, dept.id).unwrap());
        assert!(Department::find_by_id(conn, dept.id).unwrap().is_none());
    }
}
