//! JSON views of the entities.
//!
//! Datetimes are rendered as RFC 3339 strings and amounts as numbers. With
//! `include_relations`, users carry their expense and budget counts,
//! categories their expense count, and expenses and budgets embed their
//! owner and category. Budget views always include spent, remaining and usage
//! figures computed at render time.

use crate::{
    core::{budget::compute_budget_summary, category, user},
    entities::{Category, User, budget, category as category_entity, expense, user as user_entity},
    errors::Result,
};
use sea_orm::{ConnectionTrait, EntityTrait};
use serde_json::{Value, json};

fn user_fields(user: &user_entity::Model) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "username": user.username,
        "first_name": user.first_name,
        "last_name": user.last_name,
        "is_active": user.is_active,
        "created_at": user.created_at.to_rfc3339(),
        "updated_at": user.updated_at.to_rfc3339(),
    })
}

fn category_fields(category: &category_entity::Model) -> Value {
    json!({
        "id": category.id,
        "name": category.name,
        "description": category.description,
        "icon": category.icon,
        "color": category.color,
        "is_default": category.is_default,
        "user_id": category.user_id,
        "created_at": category.created_at.to_rfc3339(),
        "updated_at": category.updated_at.to_rfc3339(),
    })
}

async fn embed_owner_and_category<C>(
    db: &C,
    data: &mut Value,
    user_id: i64,
    category_id: Option<i64>,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let owner = User::find_by_id(user_id).one(db).await?;
    let category = match category_id {
        Some(id) => Category::find_by_id(id).one(db).await?,
        None => None,
    };
    data["user"] = owner.as_ref().map_or(Value::Null, user_fields);
    data["category"] = category.as_ref().map_or(Value::Null, category_fields);
    Ok(())
}

/// Renders a user. The password hash is never included.
pub async fn user_to_dict<C>(db: &C, user: &user_entity::Model, include_relations: bool) -> Result<Value>
where
    C: ConnectionTrait,
{
    let mut data = user_fields(user);
    if include_relations {
        data["expenses_count"] = json!(user::count_expenses_for_user(db, user.id).await?);
        data["budgets_count"] = json!(user::count_budgets_for_user(db, user.id).await?);
    }
    Ok(data)
}

/// Renders a category.
pub async fn category_to_dict<C>(
    db: &C,
    category: &category_entity::Model,
    include_relations: bool,
) -> Result<Value>
where
    C: ConnectionTrait,
{
    let mut data = category_fields(category);
    if include_relations {
        data["expenses_count"] =
            json!(category::count_expenses_for_category(db, category.id).await?);
    }
    Ok(data)
}

/// Renders an expense.
pub async fn expense_to_dict<C>(
    db: &C,
    expense: &expense::Model,
    include_relations: bool,
) -> Result<Value>
where
    C: ConnectionTrait,
{
    let mut data = json!({
        "id": expense.id,
        "amount": expense.amount,
        "description": expense.description,
        "notes": expense.notes,
        "expense_date": expense.expense_date.to_rfc3339(),
        "payment_method": expense.payment_method.map(|m| m.as_str()),
        "receipt_url": expense.receipt_url,
        "user_id": expense.user_id,
        "category_id": expense.category_id,
        "created_at": expense.created_at.to_rfc3339(),
        "updated_at": expense.updated_at.to_rfc3339(),
    });
    if include_relations {
        embed_owner_and_category(db, &mut data, expense.user_id, Some(expense.category_id))
            .await?;
    }
    Ok(data)
}

/// Renders a budget with its current spending figures.
pub async fn budget_to_dict<C>(
    db: &C,
    budget: &budget::Model,
    include_relations: bool,
) -> Result<Value>
where
    C: ConnectionTrait,
{
    let summary = compute_budget_summary(db, budget).await?;
    let mut data = json!({
        "id": budget.id,
        "name": budget.name,
        "amount": budget.amount,
        "period": budget.period.as_str(),
        "start_date": budget.start_date.to_rfc3339(),
        "end_date": budget.end_date.map(|d| d.to_rfc3339()),
        "alert_threshold": budget.alert_threshold,
        "is_active": budget.is_active,
        "user_id": budget.user_id,
        "category_id": budget.category_id,
        "spent_amount": summary.spent,
        "remaining_amount": summary.remaining,
        "usage_percentage": summary.usage_percentage,
        "threshold_reached": summary.threshold_reached,
        "created_at": budget.created_at.to_rfc3339(),
        "updated_at": budget.updated_at.to_rfc3339(),
    });
    if include_relations {
        embed_owner_and_category(db, &mut data, budget.user_id, budget.category_id).await?;
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_user_view_hides_password_and_counts_relations() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        create_test_expense(&db, user.id, food.id, 3.5).await?;

        let plain = user_to_dict(&db, &user, false).await?;
        assert!(plain.get("password_hash").is_none());
        assert!(plain.get("expenses_count").is_none());
        assert_eq!(plain["username"], "alice");

        let full = user_to_dict(&db, &user, true).await?;
        assert_eq!(full["expenses_count"], 1);
        assert_eq!(full["budgets_count"], 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_category_view() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        create_test_expense(&db, user.id, food.id, 3.5).await?;
        create_test_expense(&db, user.id, food.id, 1.5).await?;

        let view = category_to_dict(&db, &food, true).await?;
        assert_eq!(view["name"], "Food");
        assert_eq!(view["is_default"], false);
        assert_eq!(view["expenses_count"], 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_expense_view_embeds_relations() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 12, 30, 0).unwrap();
        let expense = create_dated_expense(&db, user.id, food.id, 25.5, date).await?;

        let view = expense_to_dict(&db, &expense, true).await?;
        assert_eq!(view["amount"], 25.5);
        assert_eq!(view["expense_date"], "2024-01-15T12:30:00+00:00");
        assert_eq!(view["payment_method"], Value::Null);
        assert_eq!(view["user"]["username"], "alice");
        assert_eq!(view["category"]["name"], "Food");

        Ok(())
    }

    #[tokio::test]
    async fn test_budget_view_carries_live_figures() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "alice").await?;
        let food = create_test_category(&db, user.id, "Food").await?;
        let date = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        create_dated_expense(&db, user.id, food.id, 320.5, date).await?;
        let budget = create_window_budget(&db, user.id, Some(food.id), 500.0).await?;

        let view = budget_to_dict(&db, &budget, false).await?;
        assert_eq!(view["period"], "monthly");
        assert_eq!(view["spent_amount"], 320.5);
        assert_eq!(view["remaining_amount"], 179.5);
        assert_eq!(view["usage_percentage"], 64.1);
        assert_eq!(view["end_date"], "2024-01-31T23:59:59+00:00");
        assert!(view.get("user").is_none());

        let overall = create_window_budget(&db, user.id, None, 100.0).await?;
        let view = budget_to_dict(&db, &overall, true).await?;
        assert_eq!(view["user"]["id"], user.id);
        assert_eq!(view["category"], Value::Null);

        Ok(())
    }
}
