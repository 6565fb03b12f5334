//! Budget business logic and the spending aggregator.
//!
//! A budget stores only its limit and window. How much of it has been used is
//! never persisted: [`compute_budget_summary`] recomputes it from the expense
//! table on every call, so the figures always reflect the current expenses.

use crate::{
    core::{category::require_visible_category, expense::ExpenseFilter, money, user::require_user},
    entities::{Budget, budget, expense},
    errors::{Error, Result},
    validation::{CreateBudget, UpdateBudget, Violations},
};
use serde::Serialize;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Derived spending figures for one budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    /// Sum of matching expenses, rounded to cents
    pub spent: f64,
    /// `amount - spent`; negative once the budget is exceeded
    pub remaining: f64,
    /// `spent / amount * 100` rounded to 2 decimals, 0 when the limit is 0
    pub usage_percentage: f64,
    /// Alert percentage copied from the budget
    pub alert_threshold: i32,
    /// Whether usage has reached the alert threshold
    pub threshold_reached: bool,
}

impl BudgetSummary {
    /// Folds already-selected expenses into the figures for `budget`.
    #[must_use]
    pub fn from_expenses(budget: &budget::Model, expenses: &[expense::Model]) -> Self {
        let spent = money::sum_amounts(expenses.iter().map(|e| e.amount));
        let usage_percentage = money::percentage(spent, budget.amount);
        Self {
            spent,
            remaining: money::subtract(budget.amount, spent),
            usage_percentage,
            alert_threshold: budget.alert_threshold,
            threshold_reached: usage_percentage >= f64::from(budget.alert_threshold),
        }
    }
}

/// The expense selection a budget covers: same owner, the budget's category
/// when it has one, and `expense_date` inside the inclusive window.
#[must_use]
pub fn budget_filter(budget: &budget::Model) -> ExpenseFilter {
    ExpenseFilter::for_user(budget.user_id)
        .category(budget.category_id)
        .between(Some(budget.start_date), budget.end_date)
}

/// Computes spent, remaining and usage for `budget` from current expenses.
///
/// Reads only; calling it twice without intervening writes yields the same
/// summary.
pub async fn compute_budget_summary<C>(db: &C, budget: &budget::Model) -> Result<BudgetSummary>
where
    C: ConnectionTrait,
{
    let expenses = budget_filter(budget).apply(db).await?;
    let summary = BudgetSummary::from_expenses(budget, &expenses);
    debug!(
        budget_id = budget.id,
        matched = expenses.len(),
        spent = summary.spent,
        "Budget summary computed"
    );
    Ok(summary)
}

/// Loads a budget and computes its summary.
///
/// This function is used when only the budget ID is known, such as when a
/// single budget is rendered with its live spending figures.
pub async fn compute_budget_summary_by_id(
    db: &DatabaseConnection,
    budget_id: i64,
) -> Result<(budget::Model, BudgetSummary)> {
    let budget = get_budget(db, budget_id).await?;
    let summary = compute_budget_summary(db, &budget).await?;
    Ok((budget, summary))
}

/// Criteria for [`list_budgets`]. Absent fields do not restrict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetQuery {
    /// Owner
    pub user_id: Option<i64>,
    /// Category scope
    pub category_id: Option<i64>,
    /// Active flag
    pub is_active: Option<bool>,
}

/// Creates a budget for `user_id`.
///
/// A category scope must be a default or one of the user's own categories.
#[instrument(skip(db, command), fields(name = %command.name))]
pub async fn create_budget(
    db: &DatabaseConnection,
    user_id: i64,
    command: CreateBudget,
) -> Result<budget::Model> {
    let txn = db.begin().await?;
    require_user(&txn, user_id).await?;
    if let Some(category_id) = command.category_id {
        require_visible_category(&txn, category_id, user_id).await?;
    }

    let now = chrono::Utc::now();
    let created = budget::ActiveModel {
        name: Set(command.name),
        amount: Set(command.amount),
        period: Set(command.period),
        start_date: Set(command.start_date),
        end_date: Set(command.end_date),
        alert_threshold: Set(command.alert_threshold),
        is_active: Set(true),
        user_id: Set(user_id),
        category_id: Set(command.category_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(budget_id = created.id, user_id, "Budget created");
    Ok(created)
}

/// Finds a budget by ID, failing with [`Error::NotFound`] when absent.
///
/// The returned row carries no spending figures; pair it with
/// [`compute_budget_summary`] when those are needed.
pub async fn get_budget(db: &DatabaseConnection, budget_id: i64) -> Result<budget::Model> {
    Budget::find_by_id(budget_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Budget", budget_id))
}

/// Lists budgets matching `query`, newest window first.
///
/// Every field of [`BudgetQuery`] narrows the result when set. Budgets sharing
/// a start date are ordered by descending ID.
pub async fn list_budgets(db: &DatabaseConnection, query: BudgetQuery) -> Result<Vec<budget::Model>> {
    let mut select = Budget::find();
    if let Some(user_id) = query.user_id {
        select = select.filter(budget::Column::UserId.eq(user_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(budget::Column::CategoryId.eq(category_id));
    }
    if let Some(is_active) = query.is_active {
        select = select.filter(budget::Column::IsActive.eq(is_active));
    }
    select
        .order_by_desc(budget::Column::StartDate)
        .order_by_desc(budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update.
///
/// A new `end_date` is checked against the stored `start_date`, and a new
/// category against the budget owner's visible categories.
#[instrument(skip(db, command))]
pub async fn update_budget(
    db: &DatabaseConnection,
    budget_id: i64,
    command: UpdateBudget,
) -> Result<budget::Model> {
    let txn = db.begin().await?;
    let existing = Budget::find_by_id(budget_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Budget", budget_id))?;

    if let Some(end_date) = command.end_date {
        let mut violations = Violations::default();
        violations.window(existing.start_date, Some(end_date));
        violations.finish(())?;
    }
    if let Some(category_id) = command.category_id {
        if existing.category_id != Some(category_id) {
            require_visible_category(&txn, category_id, existing.user_id).await?;
        }
    }

    let mut active: budget::ActiveModel = existing.into();
    if let Some(name) = command.name {
        active.name = Set(name);
    }
    if let Some(amount) = command.amount {
        active.amount = Set(amount);
    }
    if let Some(period) = command.period {
        active.period = Set(period);
    }
    if let Some(end_date) = command.end_date {
        active.end_date = Set(Some(end_date));
    }
    if let Some(alert_threshold) = command.alert_threshold {
        active.alert_threshold = Set(alert_threshold);
    }
    if let Some(is_active) = command.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(category_id) = command.category_id {
        active.category_id = Set(Some(category_id));
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}

/// Deletes a budget, failing with [`Error::NotFound`] when absent.
///
/// Expenses are untouched; they are only ever read by the budget.
#[instrument(skip(db))]
pub async fn delete_budget(db: &DatabaseConnection, budget_id: i64) -> Result<()> {
    let existing = get_budget(db, budget_id).await?;
    existing.delete(db).await?;
    info!(budget_id, "Budget deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::BudgetPeriod;
    use crate::test_utils::*;
    use crate::validation::{BudgetCreateRequest, BudgetUpdateRequest, Validate};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn january_budget(user_id: i64, category_id: Option<i64>, amount: f64) -> budget::Model {
        budget::Model {
            id: 1,
            name: "January".to_string(),
            amount,
            period: BudgetPeriod::Monthly,
            start_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_date: Some(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()),
            alert_threshold: 80,
            is_active: true,
            user_id,
            category_id,
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[tokio::test]
    async fn test_summary_for_category_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        create_dated_expense(&db, user.id, food.id, 120.25, at(3)).await?;
        create_dated_expense(&db, user.id, food.id, 200.25, at(17)).await?;
        let budget = create_window_budget(&db, user.id, Some(food.id), 500.0).await?;

        let summary = compute_budget_summary(&db, &budget).await?;

        assert_eq!(summary.spent, 320.5);
        assert_eq!(summary.remaining, 179.5);
        assert_eq!(summary.usage_percentage, 64.1);
        assert_eq!(summary.alert_threshold, 80);
        assert!(!summary.threshold_reached);

        Ok(())
    }

    #[tokio::test]
    async fn test_overall_january_budget_figures() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        let rent = create_test_category(&db, user.id, "Rent").await?;
        create_dated_expense(&db, user.id, food.id, 70.5, at(2)).await?;
        create_dated_expense(&db, user.id, rent.id, 250.0, at(28)).await?;
        let budget = create_window_budget(&db, user.id, None, 500.0).await?;

        let summary = compute_budget_summary(&db, &budget).await?;

        assert_eq!(summary.spent, 320.5);
        assert_eq!(summary.remaining, 179.5);
        assert_eq!(summary.usage_percentage, 64.1);

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        create_dated_expense(&db, user.id, food.id, 42.0, at(5)).await?;
        let budget = create_window_budget(&db, user.id, Some(food.id), 100.0).await?;

        let first = compute_budget_summary(&db, &budget).await?;
        let second = compute_budget_summary(&db, &budget).await?;
        assert_eq!(first, second);

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_reflects_later_expenses() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        let budget = create_window_budget(&db, user.id, Some(food.id), 100.0).await?;

        assert_eq!(compute_budget_summary(&db, &budget).await?.spent, 0.0);

        create_dated_expense(&db, user.id, food.id, 85.0, at(9)).await?;
        let (_, summary) = compute_budget_summary_by_id(&db, budget.id).await?;
        assert_eq!(summary.spent, 85.0);
        assert!(summary.threshold_reached);

        Ok(())
    }

    #[tokio::test]
    async fn test_overall_budget_counts_every_category() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        let travel = create_test_category(&db, user.id, "Travel").await?;
        create_dated_expense(&db, user.id, food.id, 60.0, at(2)).await?;
        create_dated_expense(&db, user.id, travel.id, 90.0, at(4)).await?;
        // Another user's spending never counts
        let bob = create_test_user(&db, "bob").await?;
        let bobs = create_test_category(&db, bob.id, "Food").await?;
        create_dated_expense(&db, bob.id, bobs.id, 1000.0, at(4)).await?;

        let overall = create_window_budget(&db, user.id, None, 100.0).await?;
        let summary = compute_budget_summary(&db, &overall).await?;

        assert_eq!(summary.spent, 150.0);
        assert_eq!(summary.remaining, -50.0);
        assert_eq!(summary.usage_percentage, 150.0);
        assert!(summary.threshold_reached);

        let scoped = create_window_budget(&db, user.id, Some(travel.id), 100.0).await?;
        assert_eq!(compute_budget_summary(&db, &scoped).await?.spent, 90.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_window_bounds_are_inclusive() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        let budget = create_window_budget(&db, user.id, Some(food.id), 100.0).await?;
        create_dated_expense(&db, user.id, food.id, 1.0, budget.start_date).await?;
        create_dated_expense(&db, user.id, food.id, 2.0, budget.end_date.unwrap()).await?;
        create_dated_expense(
            &db,
            user.id,
            food.id,
            4.0,
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
        )
        .await?;
        create_dated_expense(
            &db,
            user.id,
            food.id,
            8.0,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .await?;

        assert_eq!(compute_budget_summary(&db, &budget).await?.spent, 3.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_open_ended_window() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        create_dated_expense(&db, user.id, food.id, 5.0, at(1)).await?;
        create_dated_expense(
            &db,
            user.id,
            food.id,
            7.0,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        )
        .await?;

        let mut budget = january_budget(user.id, Some(food.id), 100.0);
        budget.end_date = None;
        assert_eq!(compute_budget_summary(&db, &budget).await?.spent, 12.0);

        Ok(())
    }

    #[test]
    fn test_zero_amount_budget_has_zero_usage() {
        let budget = january_budget(1, None, 0.0);
        let expense = expense::Model {
            id: 1,
            amount: 25.0,
            description: "Coffee".to_string(),
            notes: None,
            expense_date: at(2),
            payment_method: None,
            receipt_url: None,
            user_id: 1,
            category_id: 1,
            created_at: at(2),
            updated_at: at(2),
        };

        let summary = BudgetSummary::from_expenses(&budget, &[expense]);

        assert_eq!(summary.spent, 25.0);
        assert_eq!(summary.remaining, -25.0);
        assert_eq!(summary.usage_percentage, 0.0);
    }

    #[test]
    fn test_empty_selection() {
        let budget = january_budget(1, None, 250.0);
        let summary = BudgetSummary::from_expenses(&budget, &[]);

        assert_eq!(summary.spent, 0.0);
        assert_eq!(summary.remaining, 250.0);
        assert_eq!(summary.usage_percentage, 0.0);
        assert!(!summary.threshold_reached);
    }

    #[tokio::test]
    async fn test_create_budget_foreign_category_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let bobs = create_test_category(&db, bob.id, "Games").await?;

        let result = create_test_budget(&db, alice.id, Some(bobs.id), 50.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Category",
                ..
            }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_budget_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;

        let command = BudgetCreateRequest {
            name: "Everything".to_string(),
            amount: 1000.0,
            period: "yearly".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let budget = create_budget(&db, user.id, command).await?;

        assert!(budget.is_active);
        assert_eq!(budget.alert_threshold, 80);
        assert_eq!(budget.period, BudgetPeriod::Yearly);
        assert_eq!(budget.end_date, None);
        assert_eq!(budget.category_id, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_budget_end_date_checked_against_stored_start() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let budget = create_window_budget(&db, user.id, None, 100.0).await?;

        let command = BudgetUpdateRequest {
            end_date: Some("2023-12-01".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let result = update_budget(&db, budget.id, command).await;
        assert!(matches!(result.unwrap_err(), Error::Validation(f) if f.has_field("end_date")));

        let command = BudgetUpdateRequest {
            amount: Some(600.0),
            end_date: Some("2024-02-29".to_string()),
            is_active: Some(false),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let updated = update_budget(&db, budget.id, command).await?;
        assert_eq!(updated.amount, 600.0);
        assert!(!updated.is_active);
        assert_eq!(
            updated.end_date,
            Some(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap())
        );
        assert_eq!(updated.start_date, budget.start_date);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_budgets_query() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let food = create_test_category(&db, alice.id, "Food").await?;
        let scoped = create_window_budget(&db, alice.id, Some(food.id), 100.0).await?;
        let overall = create_window_budget(&db, alice.id, None, 300.0).await?;
        create_window_budget(&db, bob.id, None, 50.0).await?;

        let command = BudgetUpdateRequest {
            is_active: Some(false),
            ..Default::default()
        }
        .validate()
        .unwrap();
        update_budget(&db, overall.id, command).await?;

        let alices = list_budgets(
            &db,
            BudgetQuery {
                user_id: Some(alice.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(alices.len(), 2);

        let active = list_budgets(
            &db,
            BudgetQuery {
                user_id: Some(alice.id),
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(active, vec![scoped.clone()]);

        let by_category = list_budgets(
            &db,
            BudgetQuery {
                category_id: Some(food.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_category, vec![scoped]);

        assert_eq!(list_budgets(&db, BudgetQuery::default()).await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let budget = create_test_budget(&db, user.id, None, 10.0).await?;

        delete_budget(&db, budget.id).await?;
        assert!(matches!(
            get_budget(&db, budget.id).await.unwrap_err(),
            Error::NotFound {
                entity: "Budget",
                ..
            }
        ));

        Ok(())
    }
}
