//! Domain managers.
//!
//! Each manager holds the shared database (and the evidence store where files are
//! involved) and owns validation, lifecycle guards and transaction boundaries for one
//! slice of the domain. Model types stay dumb; every rule lives here or in `weights`.

pub mod achievements;
pub mod activities;
pub mod categories;
pub mod directory;
pub mod evidence;
pub mod plans;
pub mod summary;

pub use achievements::AchievementManager;
pub use activities::ActivityManager;
pub use categories::CategoryManager;
pub use directory::DirectoryManager;
pub use evidence::{EvidenceFile, EvidenceManager};
pub use plans::{PlanManager, PlanWithActivities};
pub use summary::{ExecutiveSummary, MonthlySummary, SummaryManager};

use crate::error::AppError;
use crate::models::{Achievement, Activity, Category, Plan};
use crate::validation::validate_month;
use rusqlite::Connection;

fn require_plan(conn: &Connection, plan_id: &str) -> Result<Plan, AppError> {
    Plan::find_by_id(conn, plan_id)?.ok_or_else(|| AppError::not_found("Plan", plan_id))
}

/// Load a plan that is still a draft; `action` names the refused operation.
fn require_draft_plan(conn: &Connection, plan_id: &str, action: &str) -> Result<Plan, AppError> {
    let plan = require_plan(conn, plan_id)?;
    if plan.is_submitted() {
        return Err(AppError::InvalidState(format!(
            "Cannot {action}: plan '{plan_id}' has been submitted"
        )));
    }
    Ok(plan)
}

fn require_category(conn: &Connection, category_id: i64) -> Result<Category, AppError> {
    Category::find_by_id(conn, category_id)?.ok_or_else(|| AppError::not_found("Category", category_id))
}

fn require_activity(conn: &Connection, plan_id: &str, name: &str) -> Result<Activity, AppError> {
    Activity::find_by_name(conn, plan_id, name)?
        .ok_or_else(|| AppError::not_found("Activity", format!("{plan_id}/{name}")))
}

/// Resolve an achievement by (plan, activity name, month).
fn require_achievement(
    conn: &Connection,
    plan_id: &str,
    activity_name: &str,
    month: u8,
) -> Result<(Activity, Achievement), AppError> {
    validate_month(month)?;
    let activity = require_activity(conn, plan_id, activity_name)?;
    let achievement = Achievement::find_by_activity_and_month(conn, activity.id, month)?
        .ok_or_else(|| AppError::not_found("Achievement", format!("{plan_id}/{activity_name}/{month}")))?;
    Ok((activity, achievement))
}
