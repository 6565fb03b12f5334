//! Database configuration module for the expense tracker.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. Indexes the entity macros cannot express (uniqueness of
//! category names, lookup indexes on foreign keys and dates) are created here
//! with plain SQL.

use crate::entities::{Budget, Category, Expense, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info};

/// Location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/expense_tracker.sqlite?mode=rwc";

const INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_user_name ON categories (user_id, name)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_default_name ON categories (name) WHERE user_id IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_expenses_user_date ON expenses (user_id, expense_date)",
    "CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_budgets_user ON budgets (user_id)",
];

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// [`DEFAULT_DATABASE_URL`] if not found.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file (created if missing) when no environment
/// variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    ensure_sqlite_dir(&database_url)?;
    debug!(%database_url, "Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the parent directory of a file-backed `SQLite` URL.
fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Tables are created parent first (users, categories, expenses, budgets) so
/// foreign keys resolve. Safe to call on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Expense),
        schema.create_table_from_entity(Budget),
    ];

    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    for statement in INDEXES {
        db.execute_unprepared(statement).await?;
    }

    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BudgetModel, CategoryModel, ExpenseModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<ExpenseModel> = Expense::find().limit(1).all(&db).await?;
        let _: Vec<BudgetModel> = Budget::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_default_category_names_are_unique() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let insert = "INSERT INTO categories (name, is_default, created_at, updated_at) \
                      VALUES ('Food', 1, '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')";
        db.execute_unprepared(insert).await?;
        let duplicate = db.execute_unprepared(insert).await;

        assert!(matches!(
            duplicate.map_err(crate::errors::Error::from),
            Err(crate::errors::Error::Conflict { .. })
        ));
        Ok(())
    }
}
