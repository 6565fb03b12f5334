//! Expense payload validation.

use super::{Validate, ValidationFailure, Violations};
use crate::entities::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Largest amount a single expense may record.
pub const EXPENSE_AMOUNT_MAX: f64 = 999_999.99;

const DESCRIPTION_MAX: usize = 200;
const NOTES_MAX: usize = 1000;
const RECEIPT_URL_MAX: usize = 500;

/// Raw expense creation payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseCreateRequest {
    /// Positive amount, rounded to cents
    pub amount: f64,
    /// Short description
    pub description: String,
    /// Optional notes
    #[serde(default)]
    pub notes: Option<String>,
    /// ISO-8601 date or date-time; defaults to now
    #[serde(default)]
    pub expense_date: Option<String>,
    /// One of the [`PaymentMethod`] wire names
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Optional receipt link
    #[serde(default)]
    pub receipt_url: Option<String>,
    /// Category the expense belongs to
    pub category_id: i64,
}

/// Raw partial expense update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseUpdateRequest {
    /// New amount
    #[serde(default)]
    pub amount: Option<f64>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New notes; blank clears them
    #[serde(default)]
    pub notes: Option<String>,
    /// New expense date
    #[serde(default)]
    pub expense_date: Option<String>,
    /// New payment method; blank clears it
    #[serde(default)]
    pub payment_method: Option<String>,
    /// New receipt link; blank clears it
    #[serde(default)]
    pub receipt_url: Option<String>,
    /// Move the expense to another category
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Validated expense creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateExpense {
    pub(crate) amount: f64,
    pub(crate) description: String,
    pub(crate) notes: Option<String>,
    pub(crate) expense_date: DateTime<Utc>,
    pub(crate) payment_method: Option<PaymentMethod>,
    pub(crate) receipt_url: Option<String>,
    pub(crate) category_id: i64,
}

/// Validated expense update. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpense {
    pub(crate) amount: Option<f64>,
    pub(crate) description: Option<String>,
    pub(crate) notes: Option<Option<String>>,
    pub(crate) expense_date: Option<DateTime<Utc>>,
    pub(crate) payment_method: Option<Option<PaymentMethod>>,
    pub(crate) receipt_url: Option<Option<String>>,
    pub(crate) category_id: Option<i64>,
}

impl Violations {
    fn expense_date(&mut self, value: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let date = self.datetime("expense_date", value)?;
        if date > now {
            self.push(
                "expense_date",
                "not_future",
                "expense_date cannot be in the future",
            );
        }
        Some(date)
    }

    fn payment_method(&mut self, value: Option<String>) -> Option<PaymentMethod> {
        let raw = value?;
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let method = PaymentMethod::parse(raw);
        if method.is_none() {
            let allowed: Vec<&str> = PaymentMethod::ALL.iter().map(|m| m.as_str()).collect();
            self.push(
                "payment_method",
                "enum",
                format!("payment_method must be one of: {}", allowed.join(", ")),
            );
        }
        method
    }
}

impl ExpenseCreateRequest {
    /// Validates against an explicit clock.
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<CreateExpense, ValidationFailure> {
        let mut v = Violations::default();
        let amount = v.amount("amount", self.amount, EXPENSE_AMOUNT_MAX);
        let description = v.text("description", &self.description, 1, DESCRIPTION_MAX);
        let notes = v.optional_text("notes", self.notes, NOTES_MAX);
        let expense_date = self
            .expense_date
            .as_deref()
            .and_then(|d| v.expense_date(d, now))
            .unwrap_or(now);
        let payment_method = v.payment_method(self.payment_method);
        let receipt_url = v.optional_text("receipt_url", self.receipt_url, RECEIPT_URL_MAX);
        let category_id = v.id("category_id", self.category_id);
        v.finish(CreateExpense {
            amount,
            description,
            notes,
            expense_date,
            payment_method,
            receipt_url,
            category_id,
        })
    }
}

impl Validate for ExpenseCreateRequest {
    type Command = CreateExpense;

    fn validate(self) -> Result<CreateExpense, ValidationFailure> {
        self.validate_at(Utc::now())
    }
}

impl ExpenseUpdateRequest {
    /// Validates against an explicit clock.
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<UpdateExpense, ValidationFailure> {
        let mut v = Violations::default();
        let amount = self
            .amount
            .map(|a| v.amount("amount", a, EXPENSE_AMOUNT_MAX));
        let description = self
            .description
            .map(|d| v.text("description", &d, 1, DESCRIPTION_MAX));
        let notes = self
            .notes
            .map(|n| v.optional_text("notes", Some(n), NOTES_MAX));
        let expense_date = self
            .expense_date
            .as_deref()
            .and_then(|d| v.expense_date(d, now));
        let payment_method = self
            .payment_method
            .map(|m| v.payment_method(Some(m)));
        let receipt_url = self
            .receipt_url
            .map(|u| v.optional_text("receipt_url", Some(u), RECEIPT_URL_MAX));
        let category_id = self.category_id.map(|id| v.id("category_id", id));
        v.finish(UpdateExpense {
            amount,
            description,
            notes,
            expense_date,
            payment_method,
            receipt_url,
            category_id,
        })
    }
}

impl Validate for ExpenseUpdateRequest {
    type Command = UpdateExpense;

    fn validate(self) -> Result<UpdateExpense, ValidationFailure> {
        self.validate_at(Utc::now())
    }
}
