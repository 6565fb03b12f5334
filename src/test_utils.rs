//! Shared test utilities for the expense tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. Every helper goes through
//! the validation layer and the core functions, the same path real callers use.

use crate::{
    core::{budget, category, expense, user},
    entities,
    errors::Result,
    validation::{
        BudgetCreateRequest, CategoryCreateRequest, ExpenseCreateRequest, UserCreateRequest,
        Validate,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database with all tables initialized.
///
/// Unlike [`setup_test_db`], the pool holds several connections, so tasks
/// spawned against it really do run their transactions side by side. Keep the
/// returned directory alive for as long as the connection is used.
pub async fn setup_file_test_db() -> Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("expense_tracker.sqlite").display()
    );
    let db = sea_orm::Database::connect(url).await?;
    crate::config::database::create_tables(&db).await?;
    Ok((dir, db))
}

/// Creates a test user named `username` with email `<username>@example.com`
/// and password `secret123`.
pub async fn create_test_user(db: &DatabaseConnection, username: &str) -> Result<entities::UserModel> {
    create_custom_user(db, &format!("{username}@example.com"), username).await
}

/// Creates a test user with an explicit email.
pub async fn create_custom_user(
    db: &DatabaseConnection,
    email: &str,
    username: &str,
) -> Result<entities::UserModel> {
    let command = UserCreateRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: "secret123".to_string(),
        first_name: None,
        last_name: None,
    }
    .validate()?;
    user::create_user(db, command).await
}

/// Creates a category owned by `user_id` with no description, icon or color.
pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<entities::CategoryModel> {
    let command = CategoryCreateRequest {
        name: name.to_string(),
        ..Default::default()
    }
    .validate()?;
    category::create_category(db, user_id, command).await
}

/// Records an expense dated now.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: f64,
) -> Result<entities::ExpenseModel> {
    let command = ExpenseCreateRequest {
        amount,
        description: "Test expense".to_string(),
        category_id,
        ..Default::default()
    }
    .validate()?;
    expense::create_expense(db, user_id, command).await
}

/// Records an expense at a fixed (past) date.
pub async fn create_dated_expense(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: f64,
    expense_date: DateTime<Utc>,
) -> Result<entities::ExpenseModel> {
    let command = ExpenseCreateRequest {
        amount,
        description: "Test expense".to_string(),
        expense_date: Some(expense_date.to_rfc3339()),
        category_id,
        ..Default::default()
    }
    .validate()?;
    expense::create_expense(db, user_id, command).await
}

/// Creates an open-ended monthly budget starting now.
pub async fn create_test_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: f64,
) -> Result<entities::BudgetModel> {
    let command = BudgetCreateRequest {
        name: "Test budget".to_string(),
        amount,
        period: "monthly".to_string(),
        category_id,
        ..Default::default()
    }
    .validate()?;
    budget::create_budget(db, user_id, command).await
}

/// Creates a monthly budget covering January 2024
/// (`2024-01-01T00:00:00` to `2024-01-31T23:59:59`).
pub async fn create_window_budget(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: Option<i64>,
    amount: f64,
) -> Result<entities::BudgetModel> {
    let command = BudgetCreateRequest {
        name: "January budget".to_string(),
        amount,
        period: "monthly".to_string(),
        start_date: Some("2024-01-01T00:00:00".to_string()),
        end_date: Some("2024-01-31T23:59:59".to_string()),
        alert_threshold: None,
        category_id,
    }
    .validate()?;
    budget::create_budget(db, user_id, command).await
}

/// Routes `tracing` output through the test harness so it shows up for failing
/// tests. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
