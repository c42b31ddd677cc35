use super::ActivityCategory;
use crate::weights::WeightTotals;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};

/// A weighted work item within a plan; `name` is unique per plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: i64,
    pub plan_id: String,
    pub name: String,
    pub category_tag: ActivityCategory,
    pub kpi: String,
    /// Percent of the plan (0–100).
    pub weight: f64,
    /// Numeric target kept as entered; parsed when summarising.
    pub target: String,
    pub deliverable: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewActivity {
    pub name: String,
    pub category_tag: ActivityCategory,
    pub kpi: String,
    pub weight: f64,
    pub target: String,
    pub deliverable: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityUpdate {
    pub name: Option<String>,
    pub category_tag: Option<ActivityCategory>,
    pub kpi: Option<String>,
    pub weight: Option<f64>,
    pub target: Option<String>,
    pub deliverable: Option<String>,
}

const COLUMNS: &str = "id, plan_id, name, category_tag, kpi, weight, target, deliverable";

impl Activity {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            plan_id: row.get(1)?,
            name: row.get(2)?,
            category_tag: row.get(3)?,
            kpi: row.get(4)?,
            weight: row.get(5)?,
            target: row.get(6)?,
            deliverable: row.get(7)?,
        })
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM activities WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_by_name(conn: &Connection, plan_id: &str, name: &str) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM activities WHERE plan_id = ?1 AND name = ?2"),
            params![plan_id, name],
            Self::from_row,
        )
        .optional()
    }

    pub fn name_taken(conn: &Connection, plan_id: &str, name: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM activities WHERE plan_id = ?1 AND name = ?2)",
            params![plan_id, name],
            |row| row.get(0),
        )
    }

    pub fn find_by_plan(conn: &Connection, plan_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM activities WHERE plan_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![plan_id], Self::from_row)?;
        rows.collect()
    }

    pub fn count_for_plan(conn: &Connection, plan_id: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM activities WHERE plan_id = ?1",
            params![plan_id],
            |row| row.get(0),
        )
    }

    /// Summed stored weight per category tag for a plan.
    pub fn weight_totals(conn: &Connection, plan_id: &str) -> Result<WeightTotals> {
        let mut stmt = conn.prepare(
            "SELECT category_tag, SUM(weight) FROM activities
             WHERE plan_id = ?1
             GROUP BY category_tag",
        )?;
        let rows = stmt.query_map(params![plan_id], |row| {
            Ok((row.get::<_, ActivityCategory>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut totals = WeightTotals::default();
        for row in rows {
            let (tag, sum) = row?;
            totals.add(tag, sum);
        }
        Ok(totals)
    }

    pub fn create(conn: &Connection, plan_id: &str, new: &NewActivity) -> Result<Self> {
        conn.execute(
            "INSERT INTO activities (plan_id, name, category_tag, kpi, weight, target, deliverable)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                plan_id,
                new.name,
                new.category_tag,
                new.kpi,
                new.weight,
                new.target,
                new.deliverable,
            ],
        )?;
        Ok(Self {
            id: conn.last_insert_rowid(),
            plan_id: plan_id.to_string(),
            name: new.name.clone(),
            category_tag: new.category_tag,
            kpi: new.kpi.clone(),
            weight: new.weight,
            target: new.target.clone(),
            deliverable: new.deliverable.clone(),
        })
    }

    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE activities
             SET name = ?1, category_tag = ?2, kpi = ?3, weight = ?4, target = ?5, deliverable = ?6
             WHERE id = ?7",
            params![
                self.name,
                self.category_tag,
                self.kpi,
                self.weight,
                self.target,
                self.deliverable,
                self.id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}
