use crate::db::{with_connection, with_transaction, Database};
use crate::error::{conflict_on_fk, conflict_on_unique, AppError};
use crate::models::{Category, CategoryUpdate, NewCategory};
use crate::validation::{validate_budget, validate_name};
use std::sync::{Arc, Mutex};

use super::require_category;

fn validate_budgets(routine: f64, non_routine: f64, project: f64) -> Result<(), AppError> {
    validate_budget("routine_budget", routine)?;
    validate_budget("non_routine_budget", non_routine)?;
    validate_budget("project_budget", project)
}

/// Category CRUD. Budgets are percentages per activity tag.
pub struct CategoryManager {
    db: Arc<Mutex<Database>>,
}

impl CategoryManager {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    pub fn find_all(&self) -> Result<Vec<Category>, AppError> {
        with_connection(&self.db, "load categories", |conn| Ok(Category::find_all(conn)?))
    }

    pub fn find_by_id(&self, id: i64) -> Result<Category, AppError> {
        with_connection(&self.db, "load category", |conn| require_category(conn, id))
    }

    pub fn create(&self, new: &NewCategory) -> Result<Category, AppError> {
        let name = validate_name("name", &new.name)?;
        validate_budgets(new.routine_budget, new.non_routine_budget, new.project_budget)?;
        let new = NewCategory {
            name: name.to_string(),
            ..new.clone()
        };

        with_transaction(&self.db, "create category", |tx| {
            Category::create(tx, &new)
                .map_err(|e| conflict_on_unique(e, || format!("Category '{}' already exists", new.name)))
        })
    }

    /// Lowering a budget does not re-check plans already using the category; their
    /// activities are re-validated the next time they change.
    pub fn update(&self, id: i64, update: &CategoryUpdate) -> Result<Category, AppError> {
        with_transaction(&self.db, "update category", |tx| {
            let mut category = require_category(tx, id)?;
            if let Some(name) = &update.name {
                category.name = validate_name("name", name)?.to_string();
            }
            category.routine_budget = update.routine_budget.unwrap_or(category.routine_budget);
            category.non_routine_budget = update.non_routine_budget.unwrap_or(category.non_routine_budget);
            category.project_budget = update.project_budget.unwrap_or(category.project_budget);
            validate_budgets(
                category.routine_budget,
                category.non_routine_budget,
                category.project_budget,
            )?;

            category
                .update(tx)
                .map_err(|e| conflict_on_unique(e, || format!("Category '{}' already exists", category.name)))?;
            Ok(category)
        })
    }

    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        with_transaction(&self.db, "delete category", |tx| {
            require_category(tx, id)?;
            let plans = Category::plan_count(tx, id)?;
            if plans > 0 {
                return Err(AppError::Conflict(format!(
                    "Category {id} is used by {plans} plan(s)"
                )));
            }
            Category::delete(tx, id).map_err(|e| conflict_on_fk(e, || format!("Category {id} is still in use")))?;
            Ok(())
        })
    }
}
