//! Executive summary: twelve months of weighted attainment for one plan.

use crate::constants::{MAX_PERCENT, MONTHS_PER_YEAR};
use crate::db::{with_connection, Database};
use crate::error::AppError;
use crate::models::{Achievement, Activity, ApprovalStatus, MonthlyApproval};
use crate::validation::parse_target;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::require_plan;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: u8,
    /// Activities on the plan.
    pub total_activity: usize,
    /// Achievements recorded for this month.
    pub count_activity: usize,
    pub achieved: usize,
    pub not_achieved: usize,
    /// Summed weight of the activities that met their target this month.
    pub achieve_weight: f64,
    /// Summed weight of all activities on the plan.
    pub total_weight: f64,
    pub monthly_approval: ApprovalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub plan_id: String,
    pub months: Vec<MonthlySummary>,
    pub total_achieve_weight: f64,
    pub total_weight: f64,
    /// `total_achieve_weight / total_weight × 100`, two decimals, 0 for an empty plan.
    pub total_average: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold loaded plan data into the summary. Fails if an activity that has achievements
/// carries a target that is not a number.
pub fn summarize(
    plan_id: &str,
    activities: &[Activity],
    achievements: &[Achievement],
    approvals: &[MonthlyApproval],
) -> Result<ExecutiveSummary, AppError> {
    let by_id: HashMap<i64, &Activity> = activities.iter().map(|a| (a.id, a)).collect();
    let mut targets: HashMap<i64, f64> = HashMap::new();
    let plan_weight: f64 = activities.iter().map(|a| a.weight).sum();

    let mut months = Vec::with_capacity(usize::from(MONTHS_PER_YEAR));
    for month in 1..=MONTHS_PER_YEAR {
        let mut summary = MonthlySummary {
            month,
            total_activity: activities.len(),
            count_activity: 0,
            achieved: 0,
            not_achieved: 0,
            achieve_weight: 0.0,
            total_weight: plan_weight,
            monthly_approval: approvals
                .iter()
                .find(|m| m.month == month)
                .map_or(ApprovalStatus::Pending, |m| m.approval_status),
        };

        for achievement in achievements.iter().filter(|a| a.month == month) {
            summary.count_activity += 1;
            let Some(activity) = by_id.get(&achievement.activity_id) else {
                summary.not_achieved += 1;
                continue;
            };
            let target = match targets.get(&activity.id) {
                Some(target) => *target,
                None => {
                    let parsed = parse_target(&activity.name, &activity.target)?;
                    targets.insert(activity.id, parsed);
                    parsed
                }
            };

            if achievement.achievement_value >= target {
                summary.achieved += 1;
                summary.achieve_weight += activity.weight;
            } else {
                summary.not_achieved += 1;
            }
        }
        months.push(summary);
    }

    let total_achieve_weight: f64 = months.iter().map(|m| m.achieve_weight).sum();
    let total_weight: f64 = months.iter().map(|m| m.total_weight).sum();
    let total_average = if total_weight > 0.0 {
        round2(total_achieve_weight / total_weight * MAX_PERCENT)
    } else {
        0.0
    };

    Ok(ExecutiveSummary {
        plan_id: plan_id.to_string(),
        months,
        total_achieve_weight,
        total_weight,
        total_average,
    })
}

/// Read-only reporting over a plan's recorded achievements.
pub struct SummaryManager {
    db: Arc<Mutex<Database>>,
}

impl SummaryManager {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    pub fn compute(&self, plan_id: &str) -> Result<ExecutiveSummary, AppError> {
        with_connection(&self.db, "compute executive summary", |conn| {
            require_plan(conn, plan_id)?;
            let activities = Activity::find_by_plan(conn, plan_id)?;
            let achievements = Achievement::find_by_plan(conn, plan_id)?;
            let approvals = MonthlyApproval::find_by_plan(conn, plan_id)?;
            summarize(plan_id, &activities, &achievements, &approvals)
        })
    }
}
