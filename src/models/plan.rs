use super::{ApprovalStatus, VerifyStatus};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};

/// One owner's performance plan for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    /// Business key, unique across all plans.
    pub id: String,
    pub year: i32,
    pub owner_id: String,
    pub category_id: i64,
    /// Set while the plan is submitted; `None` means draft.
    pub submitted_at: Option<DateTime<Utc>>,
    pub verify_status: VerifyStatus,
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPlan {
    pub id: String,
    pub year: i32,
    pub owner_id: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanUpdate {
    pub year: Option<i32>,
    pub owner_id: Option<String>,
    pub category_id: Option<i64>,
}

const COLUMNS: &str =
    "id, year, owner_id, category_id, submitted_at, verify_status, approval_status";

impl Plan {
    pub fn new(new: &NewPlan) -> Self {
        Self {
            id: new.id.clone(),
            year: new.year,
            owner_id: new.owner_id.clone(),
            category_id: new.category_id,
            submitted_at: None,
            verify_status: VerifyStatus::Pending,
            approval_status: ApprovalStatus::Pending,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            year: row.get(1)?,
            owner_id: row.get(2)?,
            category_id: row.get(3)?,
            submitted_at: row.get(4)?,
            verify_status: row.get(5)?,
            approval_status: row.get(6)?,
        })
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM plans WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn exists(conn: &Connection, id: &str) -> Result<bool> {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )
    }

    pub fn find_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM plans ORDER BY year DESC, id"))?;
        let rows = stmt.query_map([], Self::from_row)?;
        rows.collect()
    }

    pub fn find_by_owner(conn: &Connection, owner_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM plans WHERE owner_id = ?1 ORDER BY year DESC, id"
        ))?;
        let rows = stmt.query_map(params![owner_id], Self::from_row)?;
        rows.collect()
    }

    /// First plan (by key) the owner has for `year`.
    pub fn find_by_owner_and_year(conn: &Connection, owner_id: &str, year: i32) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM plans WHERE owner_id = ?1 AND year = ?2 ORDER BY id LIMIT 1"),
            params![owner_id, year],
            Self::from_row,
        )
        .optional()
    }

    pub fn save(&self, conn: &Connection) -> Result<()> {
        conn.execute(
            "INSERT INTO plans (id, year, owner_id, category_id, submitted_at, verify_status, approval_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                self.id,
                self.year,
                self.owner_id,
                self.category_id,
                self.submitted_at,
                self.verify_status,
                self.approval_status,
            ],
        )?;
        Ok(())
    }

    /// Write every mutable column back; the key never changes.
    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE plans
             SET year = ?1, owner_id = ?2, category_id = ?3, submitted_at = ?4,
                 verify_status = ?5, approval_status = ?6
             WHERE id = ?7",
            params![
                self.year,
                self.owner_id,
                self.category_id,
                self.submitted_at,
                self.verify_status,
                self.approval_status,
                self.id,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM plans WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }
}
