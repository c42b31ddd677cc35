use super::{AchievementStatus, ApprovalStatus, VerifyStatus};
use crate::constants::{MAX_PERCENT, MONTHS_PER_YEAR};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::{Deserialize, Serialize};

/// One month of reported progress on an activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Achievement {
    pub id: i64,
    pub activity_id: i64,
    /// 1 = January .. 12 = December
    pub month: u8,
    pub achievement_value: f64,
    /// Activity weight scaled by the reported value; see [`weighted_score`].
    pub weighted_score: f64,
    pub status: AchievementStatus,
    pub verify_status: VerifyStatus,
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AchievementUpdate {
    pub achievement_value: Option<f64>,
    pub status: Option<AchievementStatus>,
}

/// `weight × value / 100`
pub fn weighted_score(activity_weight: f64, achievement_value: f64) -> f64 {
    activity_weight * achievement_value / MAX_PERCENT
}

const COLUMNS: &str =
    "id, activity_id, month, achievement_value, weighted_score, status, verify_status, approval_status";

impl Achievement {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            activity_id: row.get(1)?,
            month: row.get(2)?,
            achievement_value: row.get(3)?,
            weighted_score: row.get(4)?,
            status: row.get(5)?,
            verify_status: row.get(6)?,
            approval_status: row.get(7)?,
        })
    }

    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM achievements WHERE id = ?1"),
            params![id],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_by_activity_and_month(conn: &Connection, activity_id: i64, month: u8) -> Result<Option<Self>> {
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM achievements WHERE activity_id = ?1 AND month = ?2"),
            params![activity_id, month],
            Self::from_row,
        )
        .optional()
    }

    pub fn find_by_activity(conn: &Connection, activity_id: i64) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM achievements WHERE activity_id = ?1 ORDER BY month"
        ))?;
        let rows = stmt.query_map(params![activity_id], Self::from_row)?;
        rows.collect()
    }

    /// Every achievement of a plan, ordered by month then activity.
    pub fn find_by_plan(conn: &Connection, plan_id: &str) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT a.id, a.activity_id, a.month, a.achievement_value, a.weighted_score,
                    a.status, a.verify_status, a.approval_status
             FROM achievements a
             JOIN activities act ON a.activity_id = act.id
             WHERE act.plan_id = ?1
             ORDER BY a.month, a.activity_id",
        )?;
        let rows = stmt.query_map(params![plan_id], Self::from_row)?;
        rows.collect()
    }

    /// Achievements of a plan for `month` whose verify status is anything but VERIFIED.
    pub fn count_unverified(conn: &Connection, plan_id: &str, month: u8) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*)
             FROM achievements a
             JOIN activities act ON a.activity_id = act.id
             WHERE act.plan_id = ?1 AND a.month = ?2 AND a.verify_status != ?3",
            params![plan_id, month, VerifyStatus::Verified],
            |row| row.get(0),
        )
    }

    pub fn count_for_plan(conn: &Connection, plan_id: &str) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*)
             FROM achievements a
             JOIN activities act ON a.activity_id = act.id
             WHERE act.plan_id = ?1",
            params![plan_id],
            |row| row.get(0),
        )
    }

    /// Insert one row per (activity, month) for every activity of the plan.
    /// Existing rows are left untouched. Returns how many rows were added.
    pub fn create_for_plan(conn: &Connection, plan_id: &str) -> Result<usize> {
        let mut activity_ids = conn.prepare("SELECT id FROM activities WHERE plan_id = ?1 ORDER BY id")?;
        let ids = activity_ids
            .query_map(params![plan_id], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>>>()?;

        let mut insert = conn.prepare(
            "INSERT OR IGNORE INTO achievements (activity_id, month) VALUES (?1, ?2)",
        )?;
        let mut inserted = 0;
        for activity_id in ids {
            for month in 1..=MONTHS_PER_YEAR {
                inserted += insert.execute(params![activity_id, month])?;
            }
        }
        Ok(inserted)
    }

    /// Recompute every month's weighted score after the activity's weight changed.
    pub fn rescore_for_activity(conn: &Connection, activity_id: i64, activity_weight: f64) -> Result<usize> {
        conn.execute(
            "UPDATE achievements SET weighted_score = ?1 * achievement_value / ?2 WHERE activity_id = ?3",
            params![activity_weight, MAX_PERCENT, activity_id],
        )
    }

    pub fn update(&self, conn: &Connection) -> Result<bool> {
        let rows_affected = conn.execute(
            "UPDATE achievements
             SET achievement_value = ?1, weighted_score = ?2, status = ?3,
                 verify_status = ?4, approval_status = ?5
             WHERE id = ?6",
            params![
                self.achievement_value,
                self.weighted_score,
                self.status,
                self.verify_status,
                self.approval_status,
                self.id,
            ],
        )?;
        Ok(rows_affected > 0)
    }
}
