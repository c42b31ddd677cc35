use super::ApprovalStatus;
use crate::constants::MONTHS_PER_YEAR;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::Serialize;

/// Per-plan, per-month sign-off record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyApproval {
    pub id: i64,
    pub plan_id: String,
    pub month: u8,
    pub approval_status: ApprovalStatus,
}

const COLUMNS: &str = "id, plan_id, month, approval_status";

impl MonthlyApproval {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            plan_id: row.get(1)?,
            month: row.get(2)?,
            approval_status: row.get(3)?,
        })
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM monthly_approvals WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_by_plan(conn: &Connection, plan_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM monthly_approvals WHERE plan_id = ?1 ORDER BY month"
        ))?;
        let rows = stmt.query_map(params![plan_id], Self::from_row)?;
        rows.collect()
    }

    /// Insert months 1..=12 for the plan, skipping months that already exist.
    pub fn create_for_plan(conn: &Connection, plan_id: &str) -> Result<usize> {
        let mut insert = conn.prepare(
            "INSERT OR IGNORE INTO monthly_approvals (plan_id, month) VALUES (?1, ?2)",
        )?;
        let mut inserted = 0;
        for month in 1..=MONTHS_PER_YEAR {
            inserted += insert.execute(params![plan_id, month])?;
        }
        Ok(inserted)
    }

    pub fn set_status(conn: &Connection, id: i64, status: ApprovalStatus) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE monthly_approvals SET approval_status = ?1 WHERE id = ?2",
            params![status, id],
        )?;
        Ok(rows_affected > 0)
    }
}
