use crate::db::{with_connection, with_transaction, Database};
use crate::error::AppError;
use crate::models::{weighted_score, Achievement, AchievementUpdate, ApprovalStatus, VerifyStatus};
use crate::validation::validate_achievement_value;
use std::sync::{Arc, Mutex};

use super::{require_achievement, require_activity};

/// Monthly achievement records, addressed by (plan id, activity name, month).
pub struct AchievementManager {
    db: Arc<Mutex<Database>>,
}

impl AchievementManager {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// The activity's achievements ordered by month.
    pub fn list_by_activity(&self, plan_id: &str, activity_name: &str) -> Result<Vec<Achievement>, AppError> {
        with_connection(&self.db, "load achievements", |conn| {
            let activity = require_activity(conn, plan_id, activity_name)?;
            Ok(Achievement::find_by_activity(conn, activity.id)?)
        })
    }

    pub fn find(&self, plan_id: &str, activity_name: &str, month: u8) -> Result<Achievement, AppError> {
        with_connection(&self.db, "load achievement", |conn| {
            require_achievement(conn, plan_id, activity_name, month).map(|(_, achievement)| achievement)
        })
    }

    /// Record a value and/or progress status; the weighted score always follows the value.
    pub fn update_value(
        &self,
        plan_id: &str,
        activity_name: &str,
        month: u8,
        update: &AchievementUpdate,
    ) -> Result<Achievement, AppError> {
        if let Some(value) = update.achievement_value {
            validate_achievement_value(value)?;
        }

        with_transaction(&self.db, "update achievement", |tx| {
            let (activity, mut achievement) = require_achievement(tx, plan_id, activity_name, month)?;
            if let Some(value) = update.achievement_value {
                achievement.achievement_value = value;
            }
            if let Some(status) = update.status {
                achievement.status = status;
            }
            achievement.weighted_score = weighted_score(activity.weight, achievement.achievement_value);
            achievement.update(tx)?;
            Ok(achievement)
        })
    }

    pub fn verify(
        &self,
        plan_id: &str,
        activity_name: &str,
        month: u8,
        status: VerifyStatus,
    ) -> Result<Achievement, AppError> {
        with_transaction(&self.db, "verify achievement", |tx| {
            let (_, mut achievement) = require_achievement(tx, plan_id, activity_name, month)?;
            achievement.verify_status = status;
            achievement.update(tx)?;
            Ok(achievement)
        })
    }

    pub fn approve(
        &self,
        plan_id: &str,
        activity_name: &str,
        month: u8,
        status: ApprovalStatus,
    ) -> Result<Achievement, AppError> {
        with_transaction(&self.db, "approve achievement", |tx| {
            let (_, mut achievement) = require_achievement(tx, plan_id, activity_name, month)?;
            achievement.approval_status = status;
            achievement.update(tx)?;
            Ok(achievement)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::AchievementStatus;
    use crate::models::ActivityCategory::Routine;
    use crate::test_utils::{activity, new_plan, setup_app};
    use crate::IppApp;

    fn approved_plan() -> (IppApp, tempfile::TempDir) {
        let (app, _store, dir) = setup_app();
        let staff = app.categories.find_all().unwrap().remove(0).id;
        app.plans
            .create_with_activities(&new_plan("IPP-1", staff), &[activity("A", Routine, 40.0)])
            .unwrap();
        app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap();
        (app, dir)
    }

    #[test]
    fn test_update_value_recomputes_weighted_score() {
        let (app, _dir) = approved_plan();

        let updated = app
            .achievements
            .update_value(
                "IPP-1",
                "A",
                4,
                &AchievementUpdate {
                    achievement_value: Some(50.0),
                    ..AchievementUpdate::default()
                },
            )
            .unwrap();
        assert!((updated.weighted_score - 20.0).abs() < 1e-9);
        assert_eq!(updated.status, AchievementStatus::NotStarted);

        let status_only = app
            .achievements
            .update_value(
                "IPP-1",
                "A",
                4,
                &AchievementUpdate {
                    status: Some(AchievementStatus::Completed),
                    ..AchievementUpdate::default()
                },
            )
            .unwrap();
        assert!((status_only.achievement_value - 50.0).abs() < 1e-9);
        assert!((status_only.weighted_score - 20.0).abs() < 1e-9);
        assert_eq!(status_only.status, AchievementStatus::Completed);
        assert_eq!(app.achievements.find("IPP-1", "A", 4).unwrap(), status_only);
    }

    #[test]
    fn test_lookup_errors() {
        let (app, _dir) = approved_plan();

        let err = app.achievements.find("IPP-1", "A", 13).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let err = app.achievements.find("IPP-1", "Missing", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let staff = app.categories.find_all().unwrap().remove(0).id;
        app.plans
            .create_with_activities(&new_plan("IPP-2", staff), &[activity("A", Routine, 10.0)])
            .unwrap();
        let err = app.achievements.find("IPP-2", "A", 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(app.achievements.list_by_activity("IPP-2", "A").unwrap().is_empty());
    }

    #[test]
    fn test_verify_and_approve_are_independent() {
        let (app, _dir) = approved_plan();

        let verified = app
            .achievements
            .verify("IPP-1", "A", 1, VerifyStatus::Verified)
            .unwrap();
        assert_eq!(verified.verify_status, VerifyStatus::Verified);
        assert_eq!(verified.approval_status, ApprovalStatus::Pending);

        let approved = app
            .achievements
            .approve("IPP-1", "A", 1, ApprovalStatus::Approved)
            .unwrap();
        assert_eq!(approved.verify_status, VerifyStatus::Verified);
        assert_eq!(approved.approval_status, ApprovalStatus::Approved);

        let other_month = app.achievements.find("IPP-1", "A", 2).unwrap();
        assert_eq!(other_month.verify_status, VerifyStatus::Pending);
    }

    #[test]
    fn test_rejects_non_finite_value() {
        let (app, _dir) = approved_plan();
        let err = app
            .achievements
            .update_value(
                "IPP-1",
                "A",
                1,
                &AchievementUpdate {
                    achievement_value: Some(f64::NAN),
                    ..AchievementUpdate::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
