//! User entity - Account owning categories, expenses and budgets.
//!
//! Deleting a user removes everything it owns. The password hash never leaves
//! the process through serialization.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, unique across users (stored lower-cased)
    #[sea_orm(unique)]
    pub email: String,
    /// Handle, unique across users (stored lower-cased)
    #[sea_orm(unique)]
    pub username: String,
    /// Argon2id PHC string produced by [`crate::core::password::hash_password`]
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Optional given name
    pub first_name: Option<String>,
    /// Optional family name
    pub last_name: Option<String>,
    /// Whether the account is enabled
    pub is_active: bool,
    /// When the user was created
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user owns many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One user owns many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
    /// One user owns many budgets
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
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
