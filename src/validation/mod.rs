//! Validation layer - turns raw client payloads into normalized commands.
//!
//! Every payload type implements [`Validate`]. Validation never stops at the
//! first problem: each violated constraint becomes one [`FieldError`], and all
//! of them are returned together in a [`ValidationFailure`]. On success the
//! returned command holds normalized values (trimmed strings, amounts rounded
//! to cents, upper-cased colors, lower-cased usernames and emails).
//!
//! Command fields are crate-private, so a command can only be obtained by
//! validating a payload.

pub mod budget;
pub mod category;
pub mod expense;
pub mod user;

pub use budget::{BudgetCreateRequest, BudgetUpdateRequest, CreateBudget, UpdateBudget};
pub use category::{CategoryCreateRequest, CategoryUpdateRequest, CreateCategory, UpdateCategory};
pub use expense::{CreateExpense, ExpenseCreateRequest, ExpenseUpdateRequest, UpdateExpense};
pub use user::{CreateUser, UpdateUser, UserCreateRequest, UserUpdateRequest};

use crate::core::money;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Validates a payload into the command the entity store accepts.
pub trait Validate {
    /// Normalized command produced on success
    type Command;

    /// Checks every constraint and returns the command, or all violations.
    fn validate(self) -> Result<Self::Command, ValidationFailure>;
}

/// A validated write, tagged by operation.
///
/// Creates carry the owning user, updates the target row. The wrapped
/// commands come only out of [`Validate::validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a user
    CreateUser(CreateUser),
    /// Change a user
    UpdateUser {
        /// Target user
        id: i64,
        /// Fields to change
        changes: UpdateUser,
    },
    /// Add a category owned by `user_id`
    CreateCategory {
        /// Owner
        user_id: i64,
        /// New category
        command: CreateCategory,
    },
    /// Change a user category
    UpdateCategory {
        /// Target category
        id: i64,
        /// Fields to change
        changes: UpdateCategory,
    },
    /// Record an expense for `user_id`
    CreateExpense {
        /// Owner
        user_id: i64,
        /// New expense
        command: CreateExpense,
    },
    /// Change an expense
    UpdateExpense {
        /// Target expense
        id: i64,
        /// Fields to change
        changes: UpdateExpense,
    },
    /// Add a budget for `user_id`
    CreateBudget {
        /// Owner
        user_id: i64,
        /// New budget
        command: CreateBudget,
    },
    /// Change a budget
    UpdateBudget {
        /// Target budget
        id: i64,
        /// Fields to change
        changes: UpdateBudget,
    },
}

impl Command {
    /// Operation name used in logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::CreateUser(_) => "create_user",
            Self::UpdateUser { .. } => "update_user",
            Self::CreateCategory { .. } => "create_category",
            Self::UpdateCategory { .. } => "update_category",
            Self::CreateExpense { .. } => "create_expense",
            Self::UpdateExpense { .. } => "update_expense",
            Self::CreateBudget { .. } => "create_budget",
            Self::UpdateBudget { .. } => "update_budget",
        }
    }
}

/// A single violated constraint on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending input field
    pub field: &'static str,
    /// Machine-readable constraint name (e.g. `"max_length"`)
    pub code: &'static str,
    /// Human-readable explanation
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    #[must_use]
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// One or more field-level violations, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Wraps a list of field errors.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Failure with exactly one field error.
    #[must_use]
    pub fn single(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, code, message)])
    }

    /// All reported field errors, in input order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any error was reported for `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// Collects violations while a payload is being checked.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    errors: Vec<FieldError>,
}

impl Violations {
    pub(crate) fn push(&mut self, field: &'static str, code: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, code, message));
    }

    /// Trims `value` and checks its length in characters.
    pub(crate) fn text(&mut self, field: &'static str, value: &str, min: usize, max: usize) -> String {
        let trimmed = value.trim().to_string();
        let len = trimmed.chars().count();
        if len < min {
            if min == 1 {
                self.push(field, "required", format!("{field} cannot be empty"));
            } else {
                self.push(
                    field,
                    "min_length",
                    format!("{field} must be at least {min} characters"),
                );
            }
        } else if len > max {
            self.push(
                field,
                "max_length",
                format!("{field} must be at most {max} characters"),
            );
        }
        trimmed
    }

    /// Trims an optional text value; blank input becomes `None`.
    pub(crate) fn optional_text(
        &mut self,
        field: &'static str,
        value: Option<String>,
        max: usize,
    ) -> Option<String> {
        let trimmed = self.text(field, value.as_deref()?, 0, max);
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Checks a positive, bounded amount and rounds it to cents.
    pub(crate) fn amount(&mut self, field: &'static str, value: f64, max: f64) -> f64 {
        if !value.is_finite() {
            self.push(field, "invalid", format!("{field} must be a finite number"));
            return value;
        }
        let rounded = money::round_amount(value);
        if rounded <= 0.0 {
            self.push(field, "greater_than", format!("{field} must be greater than 0"));
        } else if rounded > max {
            self.push(field, "less_than_equal", format!("{field} cannot exceed {max:.2}"));
        }
        rounded
    }

    /// Checks that `value` is a positive identifier.
    pub(crate) fn id(&mut self, field: &'static str, value: i64) -> i64 {
        if value <= 0 {
            self.push(field, "greater_than", format!("{field} must be greater than 0"));
        }
        value
    }

    /// Parses an ISO-8601 date or date-time.
    pub(crate) fn datetime(&mut self, field: &'static str, value: &str) -> Option<DateTime<Utc>> {
        let parsed = parse_datetime(value);
        if parsed.is_none() {
            self.push(
                field,
                "datetime",
                format!("{field} must be an ISO-8601 date or date-time"),
            );
        }
        parsed
    }

    pub(crate) fn finish<T>(self, command: T) -> Result<T, ValidationFailure> {
        if self.errors.is_empty() {
            Ok(command)
        } else {
            Err(ValidationFailure::new(self.errors))
        }
    }
}

/// Parses RFC 3339, a naive date-time (taken as UTC), or a bare `YYYY-MM-DD`
/// date (midnight UTC).
#[must_use]
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
