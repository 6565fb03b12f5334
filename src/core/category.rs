//! Category business logic - user categories plus the shared default set.
//!
//! Default categories have no owner, are visible to everyone and cannot be
//! changed through this module. User categories are visible only to their
//! owner. Names are unique per owner, and unique among defaults.

use crate::{
    config::categories::DefaultCategoryConfig,
    core::user::require_user,
    entities::{Budget, Category, Expense, budget, category, expense},
    errors::{Error, Result},
    validation::{CategoryCreateRequest, CreateCategory, UpdateCategory, Validate},
};
use sea_orm::{Condition, PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Condition matching the categories `user_id` may see.
fn visible_to(user_id: Option<i64>) -> Condition {
    let defaults = Condition::all()
        .add(category::Column::IsDefault.eq(true))
        .add(category::Column::UserId.is_null());
    match user_id {
        Some(id) => Condition::any()
            .add(defaults)
            .add(category::Column::UserId.eq(id)),
        None => defaults,
    }
}

/// Loads a category `user_id` may reference, or fails with [`Error::NotFound`].
///
/// Another user's category is reported as missing rather than forbidden.
pub(crate) async fn require_visible_category<C>(
    db: &C,
    category_id: i64,
    user_id: i64,
) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    Category::find_by_id(category_id)
        .filter(visible_to(Some(user_id)))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))
}

async fn ensure_name_free<C>(
    db: &C,
    name: &str,
    owner: Option<i64>,
    except_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut query = Category::find().filter(category::Column::Name.eq(name));
    query = match owner {
        Some(user_id) => query.filter(category::Column::UserId.eq(user_id)),
        None => query.filter(category::Column::UserId.is_null()),
    };
    if let Some(id) = except_id {
        query = query.filter(category::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        let message = if owner.is_some() {
            "Category with this name already exists for this user"
        } else {
            "Default category with this name already exists"
        };
        return Err(Error::Conflict {
            message: message.to_string(),
        });
    }
    Ok(())
}

fn refuse_default(category: &category::Model, action: &str) -> Result<()> {
    if category.is_default {
        return Err(Error::Forbidden {
            message: format!("Cannot {action} default categories"),
        });
    }
    Ok(())
}

/// Creates a category owned by `user_id`.
///
/// Fails with [`Error::NotFound`] for an unknown user and [`Error::Conflict`]
/// when the user already has a category with the same name.
#[instrument(skip(db, command), fields(name = %command.name))]
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    command: CreateCategory,
) -> Result<category::Model> {
    let txn = db.begin().await?;
    require_user(&txn, user_id).await?;
    ensure_name_free(&txn, &command.name, Some(user_id), None).await?;

    let now = chrono::Utc::now();
    let created = category::ActiveModel {
        name: Set(command.name),
        description: Set(command.description),
        icon: Set(command.icon),
        color: Set(command.color),
        is_default: Set(false),
        user_id: Set(Some(user_id)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(category_id = created.id, "Category created");
    Ok(created)
}

/// Finds a category by ID, failing with [`Error::NotFound`] when absent.
///
/// This lookup ignores ownership. Paths acting on behalf of a user go through
/// the visibility check instead, so another user's category stays hidden.
pub async fn get_category(db: &DatabaseConnection, category_id: i64) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))
}

/// Lists the defaults plus, when `user_id` is given, that user's categories.
///
/// This function is used to offer the categories a user may file expenses and
/// budgets under. Results are ordered by name, ties broken by ID.
pub async fn list_categories_for_user(
    db: &DatabaseConnection,
    user_id: Option<i64>,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(visible_to(user_id))
        .order_by_asc(category::Column::Name)
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a user category.
///
/// Default categories are refused with [`Error::Forbidden`].
#[instrument(skip(db, command))]
pub async fn update_category(
    db: &DatabaseConnection,
    category_id: i64,
    command: UpdateCategory,
) -> Result<category::Model> {
    let txn = db.begin().await?;
    let existing = Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))?;
    refuse_default(&existing, "update")?;

    if let Some(name) = command.name.as_deref() {
        if name != existing.name {
            ensure_name_free(&txn, name, existing.user_id, Some(category_id)).await?;
        }
    }

    let mut active: category::ActiveModel = existing.into();
    if let Some(name) = command.name {
        active.name = Set(name);
    }
    if let Some(description) = command.description {
        active.description = Set(description);
    }
    if let Some(icon) = command.icon {
        active.icon = Set(icon);
    }
    if let Some(color) = command.color {
        active.color = Set(color);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Deletes a user category that nothing references any more.
///
/// Default categories are refused with [`Error::Forbidden`]; a category still
/// used by an expense or budget is refused with [`Error::Conflict`].
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<()> {
    let txn = db.begin().await?;
    let existing = Category::find_by_id(category_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Category", category_id))?;
    refuse_default(&existing, "delete")?;

    let expenses = count_expenses_for_category(&txn, category_id).await?;
    let budgets = Budget::find()
        .filter(budget::Column::CategoryId.eq(category_id))
        .count(&txn)
        .await?;
    if expenses > 0 || budgets > 0 {
        return Err(Error::Conflict {
            message: format!(
                "Category is still used by {expenses} expense(s) and {budgets} budget(s)"
            ),
        });
    }

    existing.delete(&txn).await?;
    txn.commit().await?;
    info!(category_id, "Category deleted");
    Ok(())
}

/// Number of expenses filed under a category.
pub async fn count_expenses_for_category<C>(db: &C, category_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Expense::find()
        .filter(expense::Column::CategoryId.eq(category_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Inserts every configured default category that does not exist yet.
///
/// Every entry is validated like user input before anything is written.
/// Existing defaults are left untouched, so running this on every start is
/// safe. Returns the number of categories inserted.
#[instrument(skip(db, defaults), fields(configured = defaults.len()))]
pub async fn seed_default_categories(
    db: &DatabaseConnection,
    defaults: &[DefaultCategoryConfig],
) -> Result<usize> {
    let commands = defaults
        .iter()
        .map(|entry| {
            CategoryCreateRequest {
                name: entry.name.clone(),
                description: entry.description.clone(),
                icon: entry.icon.clone(),
                color: entry.color.clone(),
            }
            .validate()
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let txn = db.begin().await?;
    let mut inserted = 0;

    for command in commands {
        let exists = Category::find()
            .filter(category::Column::Name.eq(command.name.as_str()))
            .filter(category::Column::UserId.is_null())
            .one(&txn)
            .await?
            .is_some();
        if exists {
            debug!(name = %command.name, "Default category already present");
            continue;
        }

        let now = chrono::Utc::now();
        category::ActiveModel {
            name: Set(command.name),
            description: Set(command.description),
            icon: Set(command.icon),
            color: Set(command.color),
            is_default: Set(true),
            user_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        inserted += 1;
    }

    txn.commit().await?;
    info!(inserted, "Default categories seeded");
    Ok(inserted)
}
