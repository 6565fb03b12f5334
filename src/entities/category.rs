//! Category entity - Groups expenses and optionally scopes budgets.
//!
//! A category either belongs to one user or is a shared default (`user_id` is
//! NULL, `is_default` is true). Names are unique per owner and unique among
//! defaults.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Groceries", "Transport")
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Optional icon identifier or emoji
    pub icon: Option<String>,
    /// Optional `#RRGGBB` color, upper-case
    pub color: Option<String>,
    /// Shared category seeded from configuration; immutable through the API
    pub is_default: bool,
    /// Owning user, None for default categories
    pub user_id: Option<i64>,
    /// When the category was created
    pub created_at: DateTimeUtc,
    /// When the category was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each user category belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One category has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One category scopes many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
