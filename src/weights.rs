//! Category weight budgets.
//!
//! Each plan is assigned a [`CategoryBudgets`]; the activities of the plan that share a
//! category tag may not carry more combined weight than that tag's budget. Everything here
//! is a pure decision over aggregates the caller has already loaded (see
//! `Activity::weight_totals`), so callers must read those totals inside the same
//! transaction as the write they are guarding.

use crate::constants::{MAX_PERCENT, WEIGHT_EPSILON};
use crate::error::AppError;
use crate::models::ActivityCategory;
use serde::Serialize;
use std::collections::HashSet;

/// Per-tag weight ceilings in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryBudgets {
    pub routine: f64,
    pub non_routine: f64,
    pub project: f64,
}

impl CategoryBudgets {
    pub fn limit_for(&self, tag: ActivityCategory) -> f64 {
        match tag {
            ActivityCategory::Routine => self.routine,
            ActivityCategory::NonRoutine => self.non_routine,
            ActivityCategory::Project => self.project,
        }
    }
}

/// Summed activity weight per tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeightTotals {
    pub routine: f64,
    pub non_routine: f64,
    pub project: f64,
}

impl WeightTotals {
    pub fn get(&self, tag: ActivityCategory) -> f64 {
        match tag {
            ActivityCategory::Routine => self.routine,
            ActivityCategory::NonRoutine => self.non_routine,
            ActivityCategory::Project => self.project,
        }
    }

    pub fn add(&mut self, tag: ActivityCategory, weight: f64) {
        match tag {
            ActivityCategory::Routine => self.routine += weight,
            ActivityCategory::NonRoutine => self.non_routine += weight,
            ActivityCategory::Project => self.project += weight,
        }
    }
}

/// The stored state of an activity that a candidate is about to overwrite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Replaced {
    pub category_tag: ActivityCategory,
    pub weight: f64,
}

/// One entry of a batch submitted together with a new plan.
#[derive(Debug, Clone, Copy)]
pub struct BatchItem<'a> {
    pub name: &'a str,
    pub category_tag: ActivityCategory,
    pub weight: f64,
}

/// Reject weights that are not a finite percentage.
pub fn validate_weight_range(weight: f64) -> Result<(), AppError> {
    if !weight.is_finite() || !(0.0..=MAX_PERCENT).contains(&weight) {
        return Err(AppError::InvalidInput {
            field: "weight",
            reason: format!("must be between 0 and {MAX_PERCENT}, got {weight}"),
        });
    }
    Ok(())
}

fn exceeds(projected: f64, limit: f64) -> bool {
    projected > limit + WEIGHT_EPSILON
}

fn budget_exceeded(tag: ActivityCategory, projected: f64, limit: f64) -> AppError {
    AppError::InvalidInput {
        field: "weight",
        reason: format!(
            "total {tag} weight would be {projected}%, exceeding the limit of {limit}%"
        ),
    }
}

/// Weight the tag would carry if `candidate_weight` were stored under `candidate_tag`.
///
/// The replaced activity's old weight is only removed from its own tag; moving an activity
/// to a different tag adds its full weight to the new tag.
pub fn projected_total(
    candidate_weight: f64,
    candidate_tag: ActivityCategory,
    current: &WeightTotals,
    replacing: Option<Replaced>,
) -> f64 {
    let released = match replacing {
        Some(old) if old.category_tag == candidate_tag => old.weight,
        Some(_) | None => 0.0,
    };
    current.get(candidate_tag) - released + candidate_weight
}

/// Decide whether a single activity weight is admissible for the plan.
pub fn validate_weight(
    candidate_weight: f64,
    candidate_tag: ActivityCategory,
    budgets: &CategoryBudgets,
    current: &WeightTotals,
    replacing: Option<Replaced>,
) -> Result<(), AppError> {
    validate_weight_range(candidate_weight)?;

    let projected = projected_total(candidate_weight, candidate_tag, current, replacing);
    let limit = budgets.limit_for(candidate_tag);
    if exceeds(projected, limit) {
        return Err(budget_exceeded(candidate_tag, projected, limit));
    }
    Ok(())
}

/// Validate activities submitted together with a brand-new plan.
///
/// No activities exist yet, so totals start at zero. Returns the batch totals.
pub fn validate_batch<'a>(
    items: impl IntoIterator<Item = BatchItem<'a>>,
    budgets: &CategoryBudgets,
) -> Result<WeightTotals, AppError> {
    let mut names = HashSet::new();
    let mut totals = WeightTotals::default();

    for item in items {
        if !names.insert(item.name) {
            return Err(AppError::Conflict(format!(
                "Duplicate activity name '{}' in the submission",
                item.name
            )));
        }
        validate_weight_range(item.weight)?;
        totals.add(item.category_tag, item.weight);
    }

    check_totals(budgets, &totals)?;
    Ok(totals)
}

/// Check already-summed totals against every tag's budget.
pub fn check_totals(budgets: &CategoryBudgets, totals: &WeightTotals) -> Result<(), AppError> {
    for tag in ActivityCategory::ALL {
        let (projected, limit) = (totals.get(tag), budgets.limit_for(tag));
        if exceeds(projected, limit) {
            return Err(budget_exceeded(tag, projected, limit));
        }
    }
    Ok(())
}
