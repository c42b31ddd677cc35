//! Plan lifecycle.
//!
//! A plan is a draft until it is submitted. Drafts can be edited and deleted; a submitted
//! plan only moves through its verify and approval statuses until it is unsubmitted.
//! Approving a plan materializes its twelve months of achievements and monthly approvals.

use crate::db::{with_connection, with_transaction, Database};
use crate::error::{conflict_on_unique, AppError};
use crate::models::{
    Achievement, Activity, ApprovalStatus, Evidence, MonthlyApproval, NewActivity, NewPlan, Owner,
    Plan, PlanUpdate, VerifyStatus,
};
use crate::storage::{remove_best_effort, EvidenceStore};
use crate::validation::{validate_key, validate_name, validate_year};
use crate::weights::{check_totals, validate_batch, BatchItem};
use chrono::{Datelike, Utc};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use super::{require_category, require_draft_plan, require_plan};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanWithActivities {
    pub plan: Plan,
    pub activities: Vec<Activity>,
}

fn require_owner_exists(conn: &Connection, owner_id: &str) -> Result<(), AppError> {
    if Owner::exists(conn, owner_id)? {
        Ok(())
    } else {
        Err(AppError::not_found("Owner", owner_id))
    }
}

/// Trimmed, validated copy of a plan creation request.
fn normalize_new_plan(new: &NewPlan) -> Result<NewPlan, AppError> {
    validate_year(new.year)?;
    Ok(NewPlan {
        id: validate_key("id", &new.id)?.to_string(),
        owner_id: validate_key("owner_id", &new.owner_id)?.to_string(),
        ..new.clone()
    })
}

fn require_free_plan_id(conn: &Connection, id: &str) -> Result<(), AppError> {
    if Plan::exists(conn, id)? {
        return Err(AppError::Conflict(format!("Plan '{id}' already exists")));
    }
    Ok(())
}

/// Insert a draft plan after checking its key and references.
fn insert_plan(conn: &Connection, new: &NewPlan) -> Result<Plan, AppError> {
    require_free_plan_id(conn, &new.id)?;
    require_owner_exists(conn, &new.owner_id)?;
    require_category(conn, new.category_id)?;

    let plan = Plan::new(new);
    plan.save(conn)?;
    Ok(plan)
}

pub struct PlanManager {
    db: Arc<Mutex<Database>>,
    store: Arc<dyn EvidenceStore>,
}

impl PlanManager {
    pub fn new(db: Arc<Mutex<Database>>, store: Arc<dyn EvidenceStore>) -> Self {
        Self { db, store }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Plan, AppError> {
        with_connection(&self.db, "load plan", |conn| require_plan(conn, id))
    }

    pub fn find_all(&self) -> Result<Vec<Plan>, AppError> {
        with_connection(&self.db, "load plans", |conn| Ok(Plan::find_all(conn)?))
    }

    pub fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Plan>, AppError> {
        with_connection(&self.db, "load plans by owner", |conn| {
            require_owner_exists(conn, owner_id)?;
            Ok(Plan::find_by_owner(conn, owner_id)?)
        })
    }

    /// The owner's plan for the current calendar year, if there is one.
    pub fn find_active_by_owner(&self, owner_id: &str) -> Result<Option<Plan>, AppError> {
        self.find_by_owner_for_year(owner_id, Utc::now().year())
    }

    pub fn find_by_owner_for_year(&self, owner_id: &str, year: i32) -> Result<Option<Plan>, AppError> {
        with_connection(&self.db, "load active plan", |conn| {
            require_owner_exists(conn, owner_id)?;
            Ok(Plan::find_by_owner_and_year(conn, owner_id, year)?)
        })
    }

    pub fn create(&self, new: &NewPlan) -> Result<Plan, AppError> {
        let new = normalize_new_plan(new)?;
        with_transaction(&self.db, "create plan", |tx| insert_plan(tx, &new))
    }

    /// Create a plan together with its initial activities, all or nothing.
    pub fn create_with_activities(
        &self,
        new: &NewPlan,
        activities: &[NewActivity],
    ) -> Result<PlanWithActivities, AppError> {
        let new = normalize_new_plan(new)?;
        let activities = activities
            .iter()
            .map(|a| {
                Ok(NewActivity {
                    name: validate_name("name", &a.name)?.to_string(),
                    ..a.clone()
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        with_transaction(&self.db, "create plan with activities", |tx| {
            require_free_plan_id(tx, &new.id)?;
            let budgets = require_category(tx, new.category_id)?.budgets();
            validate_batch(
                activities.iter().map(|a| BatchItem {
                    name: &a.name,
                    category_tag: a.category_tag,
                    weight: a.weight,
                }),
                &budgets,
            )?;

            let plan = insert_plan(tx, &new)?;
            let activities = activities
                .iter()
                .map(|a| {
                    Activity::create(tx, &plan.id, a).map_err(|e| {
                        conflict_on_unique(e, || format!("Activity '{}' already exists", a.name))
                    })
                })
                .collect::<Result<Vec<_>, AppError>>()?;

            Ok(PlanWithActivities { plan, activities })
        })
    }

    /// Partial update of a draft plan.
    pub fn update(&self, id: &str, update: &PlanUpdate) -> Result<Plan, AppError> {
        if let Some(year) = update.year {
            validate_year(year)?;
        }

        with_transaction(&self.db, "update plan", |tx| {
            let mut plan = require_draft_plan(tx, id, "update plan")?;

            if let Some(year) = update.year {
                plan.year = year;
            }
            if let Some(owner_id) = &update.owner_id {
                require_owner_exists(tx, owner_id)?;
                plan.owner_id.clone_from(owner_id);
            }
            if let Some(category_id) = update.category_id {
                let budgets = require_category(tx, category_id)?.budgets();
                if category_id != plan.category_id {
                    check_totals(&budgets, &Activity::weight_totals(tx, id)?)?;
                }
                plan.category_id = category_id;
            }

            plan.update(tx)?;
            Ok(plan)
        })
    }

    /// Delete a draft plan with everything under it.
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        let orphaned = with_transaction(&self.db, "delete plan", |tx| {
            require_draft_plan(tx, id, "delete plan")?;
            let paths = Evidence::storage_paths_for_plan(tx, id)?;
            Plan::delete(tx, id)?;
            Ok(paths)
        })?;

        info!("Deleted plan '{id}'");
        remove_best_effort(self.store.as_ref(), &orphaned);
        Ok(())
    }

    pub fn submit(&self, id: &str) -> Result<Plan, AppError> {
        let plan = with_transaction(&self.db, "submit plan", |tx| {
            let mut plan = require_plan(tx, id)?;
            if plan.is_submitted() {
                return Err(AppError::Conflict(format!("Plan '{id}' is already submitted")));
            }
            plan.submitted_at = Some(Utc::now());
            plan.update(tx)?;
            Ok(plan)
        })?;

        info!("Plan '{id}' submitted");
        Ok(plan)
    }

    /// Return a submitted plan to draft, resetting both review statuses.
    pub fn unsubmit(&self, id: &str) -> Result<Plan, AppError> {
        let plan = with_transaction(&self.db, "unsubmit plan", |tx| {
            let mut plan = require_plan(tx, id)?;
            if !plan.is_submitted() {
                return Err(AppError::Conflict(format!("Plan '{id}' is not submitted")));
            }
            plan.submitted_at = None;
            plan.verify_status = VerifyStatus::Pending;
            plan.approval_status = ApprovalStatus::Pending;
            plan.update(tx)?;
            Ok(plan)
        })?;

        info!("Plan '{id}' returned to draft");
        Ok(plan)
    }

    pub fn verify(&self, id: &str, status: VerifyStatus) -> Result<Plan, AppError> {
        let plan = with_transaction(&self.db, "verify plan", |tx| {
            let mut plan = require_plan(tx, id)?;
            if plan.verify_status == status {
                return Err(AppError::Conflict(format!("Plan '{id}' is already {status}")));
            }
            plan.verify_status = status;
            plan.update(tx)?;
            Ok(plan)
        })?;

        info!("Plan '{id}' verify status set to {status}");
        Ok(plan)
    }

    /// Set the plan's approval status. Approval creates one achievement per activity and
    /// month plus one monthly approval per month; rows that already exist are kept.
    pub fn approve(&self, id: &str, status: ApprovalStatus) -> Result<Plan, AppError> {
        let plan = with_transaction(&self.db, "approve plan", |tx| {
            let mut plan = require_plan(tx, id)?;
            if plan.approval_status == status {
                return Err(AppError::Conflict(format!("Plan '{id}' is already {status}")));
            }

            if status == ApprovalStatus::Approved {
                if Activity::count_for_plan(tx, id)? == 0 {
                    return Err(AppError::InvalidState(format!(
                        "Cannot approve plan '{id}' without activities"
                    )));
                }
                let achievements = Achievement::create_for_plan(tx, id)?;
                let months = MonthlyApproval::create_for_plan(tx, id)?;
                info!("Plan '{id}' approved: {achievements} achievements and {months} monthly approvals created");
            }

            plan.approval_status = status;
            plan.update(tx)?;
            Ok(plan)
        })?;

        info!("Plan '{id}' approval status set to {status}");
        Ok(plan)
    }

    pub fn list_monthly_approvals(&self, plan_id: &str) -> Result<Vec<MonthlyApproval>, AppError> {
        with_connection(&self.db, "load monthly approvals", |conn| {
            require_plan(conn, plan_id)?;
            Ok(MonthlyApproval::find_by_plan(conn, plan_id)?)
        })
    }

    pub fn get_monthly_approval(&self, id: i64) -> Result<MonthlyApproval, AppError> {
        with_connection(&self.db, "load monthly approval", |conn| {
            MonthlyApproval::find_by_id(conn, id)?.ok_or_else(|| AppError::not_found("Monthly approval", id))
        })
    }

    /// Decide a month's sign-off. Approval requires every achievement of that month to be
    /// verified.
    pub fn decide_monthly_approval(&self, id: i64, status: ApprovalStatus) -> Result<MonthlyApproval, AppError> {
        let record = with_transaction(&self.db, "decide monthly approval", |tx| {
            let mut record = MonthlyApproval::find_by_id(tx, id)?
                .ok_or_else(|| AppError::not_found("Monthly approval", id))?;
            if record.approval_status == status {
                return Err(AppError::Conflict(format!(
                    "Month {} of plan '{}' is already {status}",
                    record.month, record.plan_id
                )));
            }

            if status == ApprovalStatus::Approved {
                let unverified = Achievement::count_unverified(tx, &record.plan_id, record.month)?;
                if unverified > 0 {
                    return Err(AppError::InvalidState(format!(
                        "Cannot approve month {} of plan '{}': not all achievements verified ({unverified} pending)",
                        record.month, record.plan_id
                    )));
                }
            }

            MonthlyApproval::set_status(tx, id, status)?;
            record.approval_status = status;
            Ok(record)
        })?;

        info!(
            "Month {} of plan '{}' set to {status}",
            record.month, record.plan_id
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::ActivityCategory::{NonRoutine, Project, Routine};
    use crate::models::{AchievementUpdate, ActivityUpdate};
    use crate::services::EvidenceFile;
    use crate::test_utils::{activity, new_plan, owner, setup_app};

    fn staff_id(app: &crate::IppApp) -> i64 {
        app.categories.find_all().unwrap().remove(0).id
    }

    #[test]
    fn test_create_checks_references() {
        let (app, _store, _dir) = setup_app();
        let staff = staff_id(&app);

        let plan = app.plans.create(&new_plan("IPP-1", staff)).unwrap();
        assert!(!plan.is_submitted());
        assert_eq!(plan.verify_status, VerifyStatus::Pending);
        assert_eq!(app.plans.find_by_id("IPP-1").unwrap(), plan);

        let dup = app.plans.create(&new_plan("IPP-1", staff)).unwrap_err();
        assert_eq!(dup.kind(), ErrorKind::Conflict);

        let no_category = app.plans.create(&new_plan("IPP-2", 999)).unwrap_err();
        assert_eq!(no_category.kind(), ErrorKind::NotFound);

        let no_owner = app
            .plans
            .create(&NewPlan {
                owner_id: "E404".into(),
                ..new_plan("IPP-3", staff)
            })
            .unwrap_err();
        assert_eq!(no_owner.kind(), ErrorKind::NotFound);
        assert_eq!(app.plans.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_with_activities_is_atomic() {
        let (app, _store, _dir) = setup_app();
        let staff = staff_id(&app);

        let over_budget = [activity("A", Project, 6.0), activity("B", Project, 6.0)];
        let err = app
            .plans
            .create_with_activities(&new_plan("IPP-1", staff), &over_budget)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(app.plans.find_by_id("IPP-1").unwrap_err().kind(), ErrorKind::NotFound);

        let duplicate = [activity("A", Routine, 10.0), activity(" A ", NonRoutine, 10.0)];
        let err = app
            .plans
            .create_with_activities(&new_plan("IPP-1", staff), &duplicate)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let created = app
            .plans
            .create_with_activities(
                &new_plan("IPP-1", staff),
                &[activity("A", Routine, 60.0), activity("B", Project, 10.0)],
            )
            .unwrap();
        assert_eq!(created.activities.len(), 2);
        assert_eq!(app.activities.list_by_plan("IPP-1").unwrap().len(), 2);
    }

    #[test]
    fn test_create_with_activities_reports_taken_id_first() {
        let (app, _store, _dir) = setup_app();
        let staff = staff_id(&app);
        app.plans.create(&new_plan("IPP-1", staff)).unwrap();

        let over_budget = [activity("A", Project, 6.0), activity("B", Project, 6.0)];
        let err = app
            .plans
            .create_with_activities(&new_plan("IPP-1", staff), &over_budget)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(app.activities.list_by_plan("IPP-1").unwrap().is_empty());
    }

    #[test]
    fn test_submitted_plan_is_frozen() {
        let (app, _store, _dir) = setup_app();
        let staff = staff_id(&app);
        app.plans.create(&new_plan("IPP-1", staff)).unwrap();
        app.activities.create("IPP-1", &activity("A", Routine, 30.0)).unwrap();

        let submitted = app.plans.submit("IPP-1").unwrap();
        assert!(submitted.submitted_at.is_some());
        assert_eq!(app.plans.submit("IPP-1").unwrap_err().kind(), ErrorKind::Conflict);

        let update = PlanUpdate {
            year: Some(2027),
            ..PlanUpdate::default()
        };
        assert_eq!(app.plans.update("IPP-1", &update).unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(app.plans.delete("IPP-1").unwrap_err().kind(), ErrorKind::InvalidState);
        assert_eq!(
            app.activities
                .create("IPP-1", &activity("B", Routine, 10.0))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            app.activities
                .update("IPP-1", "A", &ActivityUpdate::default())
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(app.activities.delete("IPP-1", "A").unwrap_err().kind(), ErrorKind::InvalidState);

        app.plans.verify("IPP-1", VerifyStatus::Verified).unwrap();
        app.plans.approve("IPP-1", ApprovalStatus::Rejected).unwrap();

        let draft = app.plans.unsubmit("IPP-1").unwrap();
        assert!(draft.submitted_at.is_none());
        assert_eq!(draft.verify_status, VerifyStatus::Pending);
        assert_eq!(draft.approval_status, ApprovalStatus::Pending);
        assert_eq!(app.plans.unsubmit("IPP-1").unwrap_err().kind(), ErrorKind::Conflict);

        assert_eq!(app.plans.update("IPP-1", &update).unwrap().year, 2027);
    }

    #[test]
    fn test_status_transitions_reject_no_ops() {
        let (app, _store, _dir) = setup_app();
        app.plans.create(&new_plan("IPP-1", staff_id(&app))).unwrap();

        let err = app.plans.verify("IPP-1", VerifyStatus::Pending).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        let err = app.plans.approve("IPP-1", ApprovalStatus::Pending).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(
            app.plans.verify("IPP-404", VerifyStatus::Verified).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_approve_without_activities_fails() {
        let (app, _store, _dir) = setup_app();
        app.plans.create(&new_plan("IPP-1", staff_id(&app))).unwrap();

        let err = app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(app.plans.find_by_id("IPP-1").unwrap().approval_status, ApprovalStatus::Pending);
        assert!(app.plans.list_monthly_approvals("IPP-1").unwrap().is_empty());
    }

    #[test]
    fn test_approve_materializes_months_once() {
        let (app, _store, _dir) = setup_app();
        app.plans
            .create_with_activities(
                &new_plan("IPP-1", staff_id(&app)),
                &[activity("A", Routine, 30.0), activity("B", Routine, 20.0)],
            )
            .unwrap();
        app.plans.submit("IPP-1").unwrap();

        let approved = app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap();
        assert_eq!(approved.approval_status, ApprovalStatus::Approved);
        assert_eq!(app.achievements.list_by_activity("IPP-1", "A").unwrap().len(), 12);
        assert_eq!(app.achievements.list_by_activity("IPP-1", "B").unwrap().len(), 12);
        assert_eq!(app.plans.list_monthly_approvals("IPP-1").unwrap().len(), 12);

        let again = app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap_err();
        assert_eq!(again.kind(), ErrorKind::Conflict);

        app.plans.unsubmit("IPP-1").unwrap();
        app.plans.submit("IPP-1").unwrap();
        app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap();

        let months: Vec<u8> = app
            .achievements
            .list_by_activity("IPP-1", "A")
            .unwrap()
            .iter()
            .map(|a| a.month)
            .collect();
        assert_eq!(months, (1..=12).collect::<Vec<u8>>());
        assert_eq!(app.achievements.list_by_activity("IPP-1", "B").unwrap().len(), 12);
        assert_eq!(app.plans.list_monthly_approvals("IPP-1").unwrap().len(), 12);
    }

    #[test]
    fn test_monthly_approval_requires_verified_achievements() {
        let (app, _store, _dir) = setup_app();
        app.plans
            .create_with_activities(
                &new_plan("IPP-1", staff_id(&app)),
                &[activity("A", Routine, 30.0), activity("B", NonRoutine, 20.0)],
            )
            .unwrap();
        app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap();

        let march = app
            .plans
            .list_monthly_approvals("IPP-1")
            .unwrap()
            .into_iter()
            .find(|m| m.month == 3)
            .unwrap();
        assert_eq!(march.approval_status, ApprovalStatus::Pending);

        let err = app
            .plans
            .decide_monthly_approval(march.id, ApprovalStatus::Approved)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        app.achievements.verify("IPP-1", "A", 3, VerifyStatus::Verified).unwrap();
        let err = app
            .plans
            .decide_monthly_approval(march.id, ApprovalStatus::Approved)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        app.achievements.verify("IPP-1", "B", 3, VerifyStatus::Verified).unwrap();
        let decided = app
            .plans
            .decide_monthly_approval(march.id, ApprovalStatus::Approved)
            .unwrap();
        assert_eq!(decided.approval_status, ApprovalStatus::Approved);
        assert_eq!(app.plans.get_monthly_approval(march.id).unwrap(), decided);

        let again = app
            .plans
            .decide_monthly_approval(march.id, ApprovalStatus::Approved)
            .unwrap_err();
        assert_eq!(again.kind(), ErrorKind::Conflict);

        let rejected = app
            .plans
            .decide_monthly_approval(march.id, ApprovalStatus::Rejected)
            .unwrap();
        assert_eq!(rejected.approval_status, ApprovalStatus::Rejected);
        assert_eq!(
            app.plans
                .decide_monthly_approval(999, ApprovalStatus::Approved)
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_category_switch_rechecks_totals() {
        let (app, _store, _dir) = setup_app();
        let staff = staff_id(&app);
        let lean = app
            .categories
            .create(&crate::models::NewCategory {
                name: "Lean".into(),
                routine_budget: 20.0,
                non_routine_budget: 20.0,
                project_budget: 20.0,
            })
            .unwrap();
        app.plans
            .create_with_activities(&new_plan("IPP-1", staff), &[activity("A", Routine, 40.0)])
            .unwrap();

        let switch = PlanUpdate {
            category_id: Some(lean.id),
            ..PlanUpdate::default()
        };
        let err = app.plans.update("IPP-1", &switch).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        app.activities
            .update(
                "IPP-1",
                "A",
                &ActivityUpdate {
                    weight: Some(20.0),
                    ..ActivityUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(app.plans.update("IPP-1", &switch).unwrap().category_id, lean.id);
    }

    #[test]
    fn test_find_by_owner_and_active_plan() {
        let (app, _store, _dir) = setup_app();
        let staff = staff_id(&app);
        app.directory.create_owner(&owner("E002")).unwrap();
        app.plans.create(&new_plan("IPP-2026", staff)).unwrap();
        app.plans
            .create(&NewPlan {
                year: 2025,
                ..new_plan("IPP-2025", staff)
            })
            .unwrap();

        assert_eq!(app.plans.find_by_owner("E001").unwrap().len(), 2);
        assert!(app.plans.find_by_owner("E002").unwrap().is_empty());
        assert_eq!(app.plans.find_by_owner("E404").unwrap_err().kind(), ErrorKind::NotFound);

        let active = app.plans.find_by_owner_for_year("E001", 2026).unwrap().unwrap();
        assert_eq!(active.id, "IPP-2026");
        assert!(app.plans.find_by_owner_for_year("E001", 2024).unwrap().is_none());
        assert!(app.plans.find_active_by_owner("E002").unwrap().is_none());
        assert_eq!(
            app.plans.find_active_by_owner("E404").unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_delete_removes_children_and_blobs() {
        let (app, store, _dir) = setup_app();
        app.plans
            .create_with_activities(&new_plan("IPP-1", staff_id(&app)), &[activity("A", Routine, 30.0)])
            .unwrap();
        app.plans.approve("IPP-1", ApprovalStatus::Approved).unwrap();
        app.achievements
            .update_value(
                "IPP-1",
                "A",
                1,
                &AchievementUpdate {
                    achievement_value: Some(10.0),
                    ..AchievementUpdate::default()
                },
            )
            .unwrap();
        let evidence = app
            .evidence
            .create(
                "IPP-1",
                "A",
                1,
                &EvidenceFile {
                    file_name: "report.pdf".into(),
                    content: b"%PDF".to_vec(),
                },
                None,
            )
            .unwrap();
        assert!(store.contains(&evidence.storage_path));

        app.plans.delete("IPP-1").unwrap();
        assert_eq!(app.plans.find_by_id("IPP-1").unwrap_err().kind(), ErrorKind::NotFound);
        assert!(!store.contains(&evidence.storage_path));
        assert_eq!(
            app.evidence.delete(evidence.id).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(app.plans.delete("IPP-1").unwrap_err().kind(), ErrorKind::NotFound);
    }
}
