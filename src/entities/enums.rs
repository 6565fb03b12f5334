//! String-backed enumerations stored in entity columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Informational budget period. Nothing resets a budget when a period elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Every day
    #[sea_orm(string_value = "daily")]
    Daily,
    /// Every week
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Every month
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every year
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

impl BudgetPeriod {
    /// Every period, in ascending length.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Wire name of the period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Looks a period up by its wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|period| period.as_str() == value)
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an expense was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Credit card
    #[sea_orm(string_value = "credit_card")]
    CreditCard,
    /// Debit card
    #[sea_orm(string_value = "debit_card")]
    DebitCard,
    /// Bank transfer
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Digital wallet
    #[sea_orm(string_value = "digital_wallet")]
    DigitalWallet,
    /// Anything else
    #[sea_orm(string_value = "other")]
    Other,
}

impl PaymentMethod {
    /// Every accepted payment method.
    pub const ALL: [Self; 6] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::BankTransfer,
        Self::DigitalWallet,
        Self::Other,
    ];

    /// Wire name of the payment method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::BankTransfer => "bank_transfer",
            Self::DigitalWallet => "digital_wallet",
            Self::Other => "other",
        }
    }

    /// Looks a payment method up by its wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == value)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
