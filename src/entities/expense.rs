//! Expense entity - A single recorded spend.
//!
//! Each expense has an `amount` (2 decimals), `description`, `expense_date`,
//! optional `notes`, `payment_method` and `receipt_url`, and belongs to exactly
//! one user and one category.
use super::enums::PaymentMethod;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Positive amount, rounded to cents
    pub amount: f64,
    /// Short description of the expense
    pub description: String,
    /// Optional free-form notes
    pub notes: Option<String>,
    /// When the money was spent; never in the future
    pub expense_date: DateTimeUtc,
    /// Optional payment method
    pub payment_method: Option<PaymentMethod>,
    /// Optional link to a receipt
    pub receipt_url: Option<String>,
    /// Owner of the expense
    pub user_id: i64,
    /// Category of the expense
    pub category_id: i64,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
    /// When the expense was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each expense belongs to one category
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
