//! Departments and the employees who own plans.

use crate::db::{with_connection, with_transaction, Database};
use crate::error::{conflict_on_fk, conflict_on_unique, AppError};
use crate::models::{Department, Owner, OwnerUpdate};
use crate::validation::{validate_key, validate_name};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn require_department(conn: &Connection, id: i64) -> Result<Department, AppError> {
    Department::find_by_id(conn, id)?.ok_or_else(|| AppError::not_found("Department", id))
}

fn require_owner(conn: &Connection, id: &str) -> Result<Owner, AppError> {
    Owner::find_by_id(conn, id)?.ok_or_else(|| AppError::not_found("Owner", id))
}

pub struct DirectoryManager {
    db: Arc<Mutex<Database>>,
}

impl DirectoryManager {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    pub fn find_all_departments(&self) -> Result<Vec<Department>, AppError> {
        with_connection(&self.db, "load departments", |conn| Ok(Department::find_all(conn)?))
    }

    pub fn find_department(&self, id: i64) -> Result<Department, AppError> {
        with_connection(&self.db, "load department", |conn| require_department(conn, id))
    }

    pub fn create_department(&self, name: &str) -> Result<Department, AppError> {
        let name = validate_name("name", name)?;
        with_transaction(&self.db, "create department", |tx| {
            Department::create(tx, name)
                .map_err(|e| conflict_on_unique(e, || format!("Department '{name}' already exists")))
        })
    }

    pub fn rename_department(&self, id: i64, name: &str) -> Result<Department, AppError> {
        let name = validate_name("name", name)?;
        with_transaction(&self.db, "rename department", |tx| {
            let mut department = require_department(tx, id)?;
            Department::rename(tx, id, name)
                .map_err(|e| conflict_on_unique(e, || format!("Department '{name}' already exists")))?;
            department.name = name.to_string();
            Ok(department)
        })
    }

    pub fn delete_department(&self, id: i64) -> Result<(), AppError> {
        with_transaction(&self.db, "delete department", |tx| {
            require_department(tx, id)?;
            Department::delete(tx, id)
                .map_err(|e| conflict_on_fk(e, || format!("Department {id} still has owners")))?;
            Ok(())
        })
    }

    pub fn find_all_owners(&self) -> Result<Vec<Owner>, AppError> {
        with_connection(&self.db, "load owners", |conn| Ok(Owner::find_all(conn)?))
    }

    pub fn find_owner(&self, id: &str) -> Result<Owner, AppError> {
        with_connection(&self.db, "load owner", |conn| require_owner(conn, id))
    }

    pub fn create_owner(&self, owner: &Owner) -> Result<Owner, AppError> {
        let owner = Owner {
            id: validate_key("id", &owner.id)?.to_string(),
            name: validate_name("name", &owner.name)?.to_string(),
            ..owner.clone()
        };

        with_transaction(&self.db, "create owner", |tx| {
            if let Some(department_id) = owner.department_id {
                require_department(tx, department_id)?;
            }
            owner
                .save(tx)
                .map_err(|e| conflict_on_unique(e, || format!("Owner '{}' already exists", owner.id)))?;
            Ok(owner)
        })
    }

    pub fn update_owner(&self, id: &str, update: &OwnerUpdate) -> Result<Owner, AppError> {
        with_transaction(&self.db, "update owner", |tx| {
            let mut owner = require_owner(tx, id)?;
            if let Some(name) = &update.name {
                owner.name = validate_name("name", name)?.to_string();
            }
            if let Some(department_id) = update.department_id {
                require_department(tx, department_id)?;
                owner.department_id = Some(department_id);
            }
            if update.section.is_some() {
                owner.section.clone_from(&update.section);
            }
            if update.position.is_some() {
                owner.position.clone_from(&update.position);
            }
            if update.grade.is_some() {
                owner.grade = update.grade;
            }
            owner.update(tx)?;
            Ok(owner)
        })
    }

    pub fn delete_owner(&self, id: &str) -> Result<(), AppError> {
        with_transaction(&self.db, "delete owner", |tx| {
            require_owner(tx, id)?;
            Owner::delete(tx, id).map_err(|e| conflict_on_fk(e, || format!("Owner '{id}' still owns plans")))?;
            Ok(())
        })
    }
}
