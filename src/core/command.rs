//! Single entry point applying a validated [`Command`] to the entity store.

use crate::{
    core::{budget, category, expense, user},
    entities::{BudgetModel, CategoryModel, ExpenseModel, UserModel},
    errors::Result,
    validation::Command,
};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Row written by [`apply_command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Created or updated user
    User(UserModel),
    /// Created or updated category
    Category(CategoryModel),
    /// Created or updated expense
    Expense(ExpenseModel),
    /// Created or updated budget
    Budget(BudgetModel),
}

/// Runs the store operation matching `command`.
pub async fn apply_command(db: &DatabaseConnection, command: Command) -> Result<Applied> {
    debug!(operation = command.operation(), "Applying command");
    Ok(match command {
        Command::CreateUser(command) => Applied::User(user::create_user(db, command).await?),
        Command::UpdateUser { id, changes } => {
            Applied::User(user::update_user(db, id, changes).await?)
        }
        Command::CreateCategory { user_id, command } => {
            Applied::Category(category::create_category(db, user_id, command).await?)
        }
        Command::UpdateCategory { id, changes } => {
            Applied::Category(category::update_category(db, id, changes).await?)
        }
        Command::CreateExpense { user_id, command } => {
            Applied::Expense(expense::create_expense(db, user_id, command).await?)
        }
        Command::UpdateExpense { id, changes } => {
            Applied::Expense(expense::update_expense(db, id, changes).await?)
        }
        Command::CreateBudget { user_id, command } => {
            Applied::Budget(budget::create_budget(db, user_id, command).await?)
        }
        Command::UpdateBudget { id, changes } => {
            Applied::Budget(budget::update_budget(db, id, changes).await?)
        }
    })
}
