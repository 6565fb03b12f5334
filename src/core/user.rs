//! User business logic - account creation, lookup, updates and cascading removal.
//!
//! Uniqueness of email and username is checked inside the same database
//! transaction as the write, and the unique indexes on both columns reject any
//! racing duplicate that slips past the check.

use crate::{
    core::password,
    entities::{Budget, Category, Expense, User, budget, category, expense, user},
    errors::{Error, Result},
    validation::{CreateUser, UpdateUser},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

async fn ensure_email_free<C>(db: &C, email: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = User::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::Conflict {
            message: "Email already exists".to_string(),
        });
    }
    Ok(())
}

async fn ensure_username_free<C>(db: &C, username: &str, except_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = User::find().filter(user::Column::Username.eq(username));
    if let Some(id) = except_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(Error::Conflict {
            message: "Username already exists".to_string(),
        });
    }
    Ok(())
}

/// Loads a user or fails with [`Error::NotFound`].
pub(crate) async fn require_user<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("User", user_id))
}

/// Creates a user from a validated command, hashing the password.
///
/// Fails with [`Error::Conflict`] when the email or username is taken.
#[instrument(skip(db, command), fields(username = %command.username))]
pub async fn create_user(db: &DatabaseConnection, command: CreateUser) -> Result<user::Model> {
    let password_hash = password::hash_password(&command.password)?;
    let txn = db.begin().await?;

    ensure_email_free(&txn, &command.email, None).await?;
    ensure_username_free(&txn, &command.username, None).await?;

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        email: Set(command.email),
        username: Set(command.username),
        password_hash: Set(password_hash),
        first_name: Set(command.first_name),
        last_name: Set(command.last_name),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = model.insert(&txn).await?;
    txn.commit().await?;

    info!(user_id = created.id, "User created");
    Ok(created)
}

/// Finds a user by ID, failing with [`Error::NotFound`] when absent.
///
/// This function is used wherever a caller holds a user ID from a request or
/// another row and needs the full account, e.g. before rendering a profile.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    require_user(db, user_id).await
}

/// Lists every user, oldest first.
///
/// This function backs administrative listings. Ordering by ID keeps the
/// result stable across calls when no user is added or removed in between.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update. Unset fields are left untouched.
///
/// Changing email or username re-checks uniqueness against every other user.
#[instrument(skip(db, command))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    command: UpdateUser,
) -> Result<user::Model> {
    let txn = db.begin().await?;
    let existing = require_user(&txn, user_id).await?;

    if let Some(email) = command.email.as_deref() {
        if email != existing.email {
            ensure_email_free(&txn, email, Some(user_id)).await?;
        }
    }
    if let Some(username) = command.username.as_deref() {
        if username != existing.username {
            ensure_username_free(&txn, username, Some(user_id)).await?;
        }
    }

    let mut active: user::ActiveModel = existing.into();
    if let Some(email) = command.email {
        active.email = Set(email);
    }
    if let Some(username) = command.username {
        active.username = Set(username);
    }
    if let Some(first_name) = command.first_name {
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = command.last_name {
        active.last_name = Set(last_name);
    }
    if let Some(is_active) = command.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Deletes a user together with every expense, budget and category it owns.
///
/// Owned rows are removed explicitly, in dependency order, inside one
/// transaction; the `ON DELETE CASCADE` foreign keys are a second net.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let existing = require_user(&txn, user_id).await?;

    let expenses = Expense::delete_many()
        .filter(expense::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let budgets = Budget::delete_many()
        .filter(budget::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    let categories = Category::delete_many()
        .filter(category::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;
    info!(
        user_id,
        expenses = expenses.rows_affected,
        budgets = budgets.rows_affected,
        categories = categories.rows_affected,
        "User deleted"
    );
    Ok(())
}

/// Number of registered users.
pub async fn count_users<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    User::find().count(db).await.map_err(Into::into)
}

/// Number of expenses recorded by a user.
pub async fn count_expenses_for_user<C>(db: &C, user_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Number of budgets owned by a user.
pub async fn count_budgets_for_user<C>(db: &C, user_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}
