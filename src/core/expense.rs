//! Expense business logic - recording spends and selecting them by filter.
//!
//! [`ExpenseFilter`] is the single selection path used by listings and by the
//! budget aggregator: owner, optional category, and an inclusive date range.

use crate::{
    core::{category::require_visible_category, user::require_user},
    entities::{Expense, expense},
    errors::{Error, Result},
    validation::{CreateExpense, FieldError, UpdateExpense, ValidationFailure, parse_datetime},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Select, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Selection criteria for expenses. All present criteria must match.
///
/// Both date bounds are inclusive. An absent bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Owner; None selects across all users
    pub user_id: Option<i64>,
    /// Restrict to one category
    pub category_id: Option<i64>,
    /// Earliest `expense_date` to include
    pub start_date: Option<DateTime<Utc>>,
    /// Latest `expense_date` to include
    pub end_date: Option<DateTime<Utc>>,
}

impl ExpenseFilter {
    /// Filter matching every expense owned by `user_id`.
    #[must_use]
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Restricts the filter to a category when one is given.
    #[must_use]
    pub const fn category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Sets the inclusive date range.
    #[must_use]
    pub const fn between(
        mut self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Builds a filter from raw query-string values.
    ///
    /// Dates accept the same formats as expense payloads. Every unparseable
    /// bound is reported, keyed by `start_date` or `end_date`.
    pub fn parse(
        user_id: Option<i64>,
        category_id: Option<i64>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> std::result::Result<Self, ValidationFailure> {
        let mut errors = Vec::new();
        let mut bound = |field: &'static str, raw: Option<&str>| {
            let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
            let parsed = parse_datetime(raw);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    field,
                    "datetime",
                    format!("{field} must be an ISO-8601 date or date-time"),
                ));
            }
            parsed
        };
        let start_date = bound("start_date", start_date);
        let end_date = bound("end_date", end_date);

        if !errors.is_empty() {
            return Err(ValidationFailure::new(errors));
        }
        Ok(Self {
            user_id,
            category_id,
            start_date,
            end_date,
        })
    }

    fn select(&self) -> Select<Expense> {
        let mut query = Expense::find();
        if let Some(user_id) = self.user_id {
            query = query.filter(expense::Column::UserId.eq(user_id));
        }
        if let Some(category_id) = self.category_id {
            query = query.filter(expense::Column::CategoryId.eq(category_id));
        }
        if let Some(start) = self.start_date {
            query = query.filter(expense::Column::ExpenseDate.gte(start));
        }
        if let Some(end) = self.end_date {
            query = query.filter(expense::Column::ExpenseDate.lte(end));
        }
        query
    }

    /// Runs the filter, newest expense first.
    pub async fn apply<C>(&self, db: &C) -> Result<Vec<expense::Model>>
    where
        C: ConnectionTrait,
    {
        self.select()
            .order_by_desc(expense::Column::ExpenseDate)
            .order_by_desc(expense::Column::Id)
            .all(db)
            .await
            .map_err(Into::into)
    }
}

/// Returns the expenses matching `filter`, newest first.
///
/// This is the single query behind expense listings and budget aggregation,
/// so both see exactly the same rows for the same owner, category and window.
pub async fn filter_expenses(
    db: &DatabaseConnection,
    filter: &ExpenseFilter,
) -> Result<Vec<expense::Model>> {
    filter.apply(db).await
}

/// Lists a user's expenses, or every expense when `user_id` is None.
///
/// This function is used for unfiltered listings; the unscoped form is meant
/// for administrative callers only.
pub async fn list_expenses(
    db: &DatabaseConnection,
    user_id: Option<i64>,
) -> Result<Vec<expense::Model>> {
    ExpenseFilter {
        user_id,
        ..ExpenseFilter::default()
    }
    .apply(db)
    .await
}

/// Records an expense for `user_id`.
///
/// The category must be a default or one of the user's own categories.
#[instrument(skip(db, command), fields(amount = command.amount))]
pub async fn create_expense(
    db: &DatabaseConnection,
    user_id: i64,
    command: CreateExpense,
) -> Result<expense::Model> {
    let txn = db.begin().await?;
    require_user(&txn, user_id).await?;
    require_visible_category(&txn, command.category_id, user_id).await?;

    let now = Utc::now();
    let created = expense::ActiveModel {
        amount: Set(command.amount),
        description: Set(command.description),
        notes: Set(command.notes),
        expense_date: Set(command.expense_date),
        payment_method: Set(command.payment_method),
        receipt_url: Set(command.receipt_url),
        user_id: Set(user_id),
        category_id: Set(command.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(expense_id = created.id, user_id, "Expense recorded");
    Ok(created)
}

/// Finds an expense by ID, failing with [`Error::NotFound`] when absent.
///
/// This function is used to load an expense before displaying or changing it.
pub async fn get_expense(db: &DatabaseConnection, expense_id: i64) -> Result<expense::Model> {
    Expense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Expense", expense_id))
}

/// Applies a partial update. Unset fields are left untouched.
///
/// Moving the expense to another category re-checks that the category is
/// visible to the expense's owner. The amount arrives already rounded to cents.
#[instrument(skip(db, command))]
pub async fn update_expense(
    db: &DatabaseConnection,
    expense_id: i64,
    command: UpdateExpense,
) -> Result<expense::Model> {
    let txn = db.begin().await?;
    let existing = Expense::find_by_id(expense_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Expense", expense_id))?;

    if let Some(category_id) = command.category_id {
        if category_id != existing.category_id {
            require_visible_category(&txn, category_id, existing.user_id).await?;
        }
    }

    let mut active: expense::ActiveModel = existing.into();
    if let Some(amount) = command.amount {
        active.amount = Set(amount);
    }
    if let Some(description) = command.description {
        active.description = Set(description);
    }
    if let Some(notes) = command.notes {
        active.notes = Set(notes);
    }
    if let Some(expense_date) = command.expense_date {
        active.expense_date = Set(expense_date);
    }
    if let Some(payment_method) = command.payment_method {
        active.payment_method = Set(payment_method);
    }
    if let Some(receipt_url) = command.receipt_url {
        active.receipt_url = Set(receipt_url);
    }
    if let Some(category_id) = command.category_id {
        active.category_id = Set(category_id);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Deletes an expense, failing with [`Error::NotFound`] when absent.
///
/// Budgets are never stored with a running total, so every summary computed
/// after this call simply no longer counts the expense.
#[instrument(skip(db))]
pub async fn delete_expense(db: &DatabaseConnection, expense_id: i64) -> Result<()> {
    let existing = get_expense(db, expense_id).await?;
    existing.delete(db).await?;
    info!(expense_id, "Expense deleted");
    Ok(())
}
