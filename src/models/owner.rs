use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};

/// An employee who owns plans. Credentials live with the auth layer, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Employee number; the business key plans refer to.
    pub id: String,
    pub name: String,
    pub section: Option<String>,
    pub position: Option<String>,
    pub grade: Option<i32>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerUpdate {
    pub name: Option<String>,
    pub section: Option<String>,
    pub position: Option<String>,
    pub grade: Option<i32>,
    pub department_id: Option<i64>,
}

const COLUMNS: &str = "id, name, section, position, grade, department_id";

impl Owner {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            section: row.get(2)?,
            position: row.get(3)?,
            grade: row.get(4)?,
            department_id: row.get(5)?,
        })
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM owners WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn exists(conn: &Connection, id: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM owners WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM owners ORDER BY id"))?;
        let rows = stmt.query_map([], Self::from_row)?;
        rows.collect()
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO owners (id, name, section, position, grade, department_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.id,
                self.name,
                self.section,
                self.position,
                self.grade,
                self.department_id,
            ],
        )?;
        Ok(())
    }

    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE owners SET name = ?1, section = ?2, position = ?3, grade = ?4, department_id = ?5
             WHERE id = ?6",
            params![
                self.name,
                self.section,
                self.position,
                self.grade,
                self.department_id,
                self.id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM owners WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{owner, setup_test_db};

    #[test]
    fn test_save_and_find_owner() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();

        assert!(!Owner::exists(conn, "E001").unwrap());
        owner("E001").save(conn).unwrap();
        assert!(Owner::exists(conn, "E001").unwrap());

        let found = Owner::find_by_id(conn, "E001").unwrap().unwrap();
        assert_eq!(found, owner("E001"));
    }

    #[test]
    fn test_update_owner() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        let mut o = owner("E001");
        o.save(conn).unwrap();

        o.grade = Some(7);
        assert!(o.update(conn).unwrap());
        assert_eq!(Owner::find_by_id(conn, "E001").unwrap().unwrap().grade, Some(7));
    }
}
