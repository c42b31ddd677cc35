use crate::weights::CategoryBudgets;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};

/// A budget profile plans are assigned to; budgets are percentages (0–100).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub routine_budget: f64,
    pub non_routine_budget: f64,
    pub project_budget: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub routine_budget: f64,
    pub non_routine_budget: f64,
    pub project_budget: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub routine_budget: Option<f64>,
    pub non_routine_budget: Option<f64>,
    pub project_budget: Option<f64>,
}

const COLUMNS: &str = "id, name, routine_budget, non_routine_budget, project_budget";

impl Category {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            routine_budget: row.get(2)?,
            non_routine_budget: row.get(3)?,
            project_budget: row.get(4)?,
        })
    }

    pub fn budgets(&self) -> CategoryBudgets {
        CategoryBudgets {
            routine: self.routine_budget,
            non_routine: self.non_routine_budget,
            project: self.project_budget,
        }
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM categories WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM categories ORDER BY name"))?;
        let rows = stmt.query_map([], Self::from_row)?;
        rows.collect()
    }

    pub fn create(conn: &Connection, new: &NewCategory) -> Result<Self> {
        conn.execute(
            "INSERT INTO categories (name, routine_budget, non_routine_budget, project_budget)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.routine_budget, new.non_routine_budget, new.project_budget],
        )?;
        Ok(Self {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            routine_budget: new.routine_budget,
            non_routine_budget: new.non_routine_budget,
            project_budget: new.project_budget,
        })
    }

    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE categories
             SET name = ?1, routine_budget = ?2, non_routine_budget = ?3, project_budget = ?4
             WHERE id = ?5",
            params![
                self.name,
                self.routine_budget,
                self.non_routine_budget,
                self.project_budget,
                self.id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    /// Number of plans assigned to this category.
    pub fn plan_count(conn: &Connection, id: i64) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM plans WHERE category_id = ?1",
            params![id],
            |row| row.get(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{setup_test_db, staff_category};

    #[test]
    fn test_create_and_find_category() {
        let (db, _dir) = setup_test_db();
        let cat = Category::create(db.connection(), &staff_category()).unwrap();
        assert_eq!(cat.name, "Staff");

        let found = Category::find_by_id(db.connection(), cat.id).unwrap();
        assert_eq!(found, Some(cat));
        assert!(Category::find_by_id(db.connection(), 999).unwrap().is_none());
    }

    #[test]
    fn test_update_and_delete_category() {
        let (db, _dir) = setup_test_db();
        let conn = db.connection();
        let mut cat = Category::create(conn, &staff_category()).unwrap();

        cat.project_budget = 25.0;
        assert!(cat.update(conn).unwrap());
        let found = Category::find_by_id(conn, cat.id).unwrap().unwrap();
        assert!((found.project_budget - 25.0).abs() < f64::EPSILON);

        assert!(Category::delete(conn, cat.id).unwrap());
        assert!(!Category::delete(conn, cat.id).unwrap());
    }

    #[test]
    fn test_budgets_maps_columns() {
        let (db, _dir) = setup_test_db();
        let cat = Category::create(db.connection(), &staff_category()).unwrap();
        let budgets = cat.budgets();
        assert!((budgets.routine - 60.0).abs() < f64::EPSILON);
        assert!((budgets.non_routine - 30.0).abs() < f64::EPSILON);
        assert!((budgets.project - 10.0).abs() < f64::EPSILON);
    }
}
