//! Budget entity - A spending limit over a date window.
//!
//! Spent, remaining and usage figures are not columns: they are derived from
//! the expense table on every read by [`crate::core::budget`].

use super::enums::BudgetPeriod;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name (e.g., "Monthly Food Budget")
    pub name: String,
    /// Spending limit, rounded to cents
    pub amount: f64,
    /// Informational period label
    pub period: BudgetPeriod,
    /// Inclusive lower bound of the budget window
    pub start_date: DateTimeUtc,
    /// Inclusive upper bound of the budget window, None for open-ended
    pub end_date: Option<DateTimeUtc>,
    /// Usage percentage (1-100) at which consumers should alert
    pub alert_threshold: i32,
    /// Whether the budget is being tracked
    pub is_active: bool,
    /// Owner of the budget
    pub user_id: i64,
    /// Category scope, None for an overall budget
    pub category_id: Option<i64>,
    /// When the budget was created
    pub created_at: DateTimeUtc,
    /// When the budget was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each budget belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// A budget may be scoped to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
