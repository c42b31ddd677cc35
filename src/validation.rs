use crate::constants::{MAX_FILE_NAME_LEN, MAX_NAME_LEN, MAX_PERCENT, MAX_PLAN_KEY_LEN, MONTHS_PER_YEAR};
use crate::error::AppError;

/// Validate a display name (activity, category, department, owner).
pub fn validate_name<'a>(field: &'static str, name: &'a str) -> Result<&'a str, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput {
            field,
            reason: "cannot be empty".into(),
        });
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::InvalidInput {
            field,
            reason: format!("cannot exceed {MAX_NAME_LEN} characters"),
        });
    }
    Ok(name)
}

/// Validate a business key (plan id, owner id).
pub fn validate_key<'a>(field: &'static str, key: &'a str) -> Result<&'a str, AppError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::InvalidInput {
            field,
            reason: "cannot be empty".into(),
        });
    }
    if key.chars().count() > MAX_PLAN_KEY_LEN {
        return Err(AppError::InvalidInput {
            field,
            reason: format!("cannot exceed {MAX_PLAN_KEY_LEN} characters"),
        });
    }
    if key.chars().any(char::is_control) {
        return Err(AppError::InvalidInput {
            field,
            reason: "cannot contain control characters".into(),
        });
    }
    Ok(key)
}

/// Validate a plan year.
pub fn validate_year(year: i32) -> Result<(), AppError> {
    if !(1900..=9999).contains(&year) {
        return Err(AppError::InvalidInput {
            field: "year",
            reason: format!("must be 1900-9999, got {year}"),
        });
    }
    Ok(())
}

/// Validate a calendar month (1-12).
pub fn validate_month(month: u8) -> Result<(), AppError> {
    if !(1..=MONTHS_PER_YEAR).contains(&month) {
        return Err(AppError::InvalidInput {
            field: "month",
            reason: format!("must be 1-{MONTHS_PER_YEAR}, got {month}"),
        });
    }
    Ok(())
}

/// Validate a category budget (a percentage).
pub fn validate_budget(field: &'static str, budget: f64) -> Result<(), AppError> {
    if !budget.is_finite() || !(0.0..=MAX_PERCENT).contains(&budget) {
        return Err(AppError::InvalidInput {
            field,
            reason: format!("must be between 0 and {MAX_PERCENT}"),
        });
    }
    Ok(())
}

/// Validate a reported achievement value.
pub fn validate_achievement_value(value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::InvalidInput {
            field: "achievement_value",
            reason: "must be a finite number".into(),
        });
    }
    Ok(())
}

/// Validate an evidence file name; it becomes the last segment of a storage path.
pub fn validate_file_name(name: &str) -> Result<&str, AppError> {
    let err = |reason: &str| AppError::InvalidInput {
        field: "file_name",
        reason: reason.into(),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(err("cannot be empty"));
    }
    if name.len() > MAX_FILE_NAME_LEN {
        return Err(err("is too long"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." || name.contains("..") {
        return Err(err("cannot contain path separators or '..'"));
    }
    if name.chars().any(char::is_control) {
        return Err(err("cannot contain control characters"));
    }
    Ok(name)
}

/// Parse an activity target such as "100", " 75.5 " or "90%".
pub fn parse_target(activity_name: &str, target: &str) -> Result<f64, AppError> {
    let trimmed = target.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::InvalidInput {
            field: "target",
            reason: format!("target '{target}' of activity '{activity_name}' is not a number"),
        })
}
