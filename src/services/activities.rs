use crate::db::{with_connection, with_transaction, Database};
use crate::error::{conflict_on_unique, AppError};
use crate::models::{Achievement, Activity, ActivityUpdate, Evidence, NewActivity};
use crate::storage::{remove_best_effort, EvidenceStore};
use crate::validation::validate_name;
use crate::weights::{validate_weight, Replaced};
use log::info;
use std::sync::{Arc, Mutex};

use super::{require_activity, require_category, require_draft_plan, require_plan};

/// Activities of draft plans, addressed by (plan id, activity name).
///
/// Every write reads the plan's per-tag weight totals inside its own transaction, so two
/// concurrent writers can never both squeeze under the same budget.
pub struct ActivityManager {
    db: Arc<Mutex<Database>>,
    store: Arc<dyn EvidenceStore>,
}

impl ActivityManager {
    pub fn new(db: Arc<Mutex<Database>>, store: Arc<dyn EvidenceStore>) -> Self {
        Self { db, store }
    }

    pub fn list_by_plan(&self, plan_id: &str) -> Result<Vec<Activity>, AppError> {
        with_connection(&self.db, "load activities", |conn| {
            require_plan(conn, plan_id)?;
            Ok(Activity::find_by_plan(conn, plan_id)?)
        })
    }

    pub fn create(&self, plan_id: &str, new: &NewActivity) -> Result<Activity, AppError> {
        let new = NewActivity {
            name: validate_name("name", &new.name)?.to_string(),
            ..new.clone()
        };

        with_transaction(&self.db, "create activity", |tx| {
            let plan = require_draft_plan(tx, plan_id, "add activity")?;
            if Activity::name_taken(tx, plan_id, &new.name)? {
                return Err(AppError::Conflict(format!(
                    "Activity '{}' already exists in plan '{plan_id}'",
                    new.name
                )));
            }

            let budgets = require_category(tx, plan.category_id)?.budgets();
            let totals = Activity::weight_totals(tx, plan_id)?;
            validate_weight(new.weight, new.category_tag, &budgets, &totals, None)?;

            Activity::create(tx, plan_id, &new).map_err(|e| {
                conflict_on_unique(e, || format!("Activity '{}' already exists in plan '{plan_id}'", new.name))
            })
        })
    }

    /// Partial update. Changing weight or tag re-runs the budget check with the stored
    /// activity's contribution released from its old tag.
    pub fn update(&self, plan_id: &str, name: &str, update: &ActivityUpdate) -> Result<Activity, AppError> {
        with_transaction(&self.db, "update activity", |tx| {
            let plan = require_draft_plan(tx, plan_id, "update activity")?;
            let mut activity = require_activity(tx, plan_id, name)?;
            let replaced = Replaced {
                category_tag: activity.category_tag,
                weight: activity.weight,
            };

            if let Some(new_name) = &update.name {
                let new_name = validate_name("name", new_name)?;
                if new_name != activity.name && Activity::name_taken(tx, plan_id, new_name)? {
                    return Err(AppError::Conflict(format!(
                        "Activity '{new_name}' already exists in plan '{plan_id}'"
                    )));
                }
                activity.name = new_name.to_string();
            }
            if let Some(kpi) = &update.kpi {
                activity.kpi.clone_from(kpi);
            }
            if let Some(target) = &update.target {
                activity.target.clone_from(target);
            }
            if let Some(deliverable) = &update.deliverable {
                activity.deliverable.clone_from(deliverable);
            }

            if update.weight.is_some() || update.category_tag.is_some() {
                activity.weight = update.weight.unwrap_or(activity.weight);
                activity.category_tag = update.category_tag.unwrap_or(activity.category_tag);

                let budgets = require_category(tx, plan.category_id)?.budgets();
                let totals = Activity::weight_totals(tx, plan_id)?;
                validate_weight(activity.weight, activity.category_tag, &budgets, &totals, Some(replaced))?;
            }

            activity.update(tx).map_err(|e| {
                conflict_on_unique(e, || format!("Activity '{}' already exists in plan '{plan_id}'", activity.name))
            })?;
            if update.weight.is_some() {
                Achievement::rescore_for_activity(tx, activity.id, activity.weight)?;
            }
            Ok(activity)
        })
    }

    pub fn delete(&self, plan_id: &str, name: &str) -> Result<(), AppError> {
        let orphaned = with_transaction(&self.db, "delete activity", |tx| {
            require_draft_plan(tx, plan_id, "delete activity")?;
            let activity = require_activity(tx, plan_id, name)?;
            let paths = Evidence::storage_paths_for_activity(tx, activity.id)?;
            Activity::delete(tx, activity.id)?;
            Ok(paths)
        })?;

        info!("Deleted activity '{name}' from plan '{plan_id}'");
        remove_best_effort(self.store.as_ref(), &orphaned);
        Ok(())
    }
}
