//! Budget payload validation.

use super::{Validate, ValidationFailure, Violations};
use crate::entities::BudgetPeriod;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Largest limit a budget may carry.
pub const BUDGET_AMOUNT_MAX: f64 = 9_999_999.99;
/// Threshold used when the payload does not set one.
pub const DEFAULT_ALERT_THRESHOLD: i32 = 80;

const NAME_MAX: usize = 100;

/// Raw budget creation payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetCreateRequest {
    /// Budget name
    pub name: String,
    /// Positive limit, rounded to cents
    pub amount: f64,
    /// One of `daily`, `weekly`, `monthly`, `yearly`
    pub period: String,
    /// ISO-8601 start of the window; defaults to now
    #[serde(default)]
    pub start_date: Option<String>,
    /// ISO-8601 end of the window; absent for open-ended budgets
    #[serde(default)]
    pub end_date: Option<String>,
    /// Alert percentage (1-100), defaults to 80
    #[serde(default)]
    pub alert_threshold: Option<i32>,
    /// Category scope; absent for an overall budget
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Raw partial budget update. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdateRequest {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New limit
    #[serde(default)]
    pub amount: Option<f64>,
    /// New period label
    #[serde(default)]
    pub period: Option<String>,
    /// New end of the window
    #[serde(default)]
    pub end_date: Option<String>,
    /// New alert percentage
    #[serde(default)]
    pub alert_threshold: Option<i32>,
    /// Pause or resume tracking
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Move the budget to another category
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// Validated budget creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateBudget {
    pub(crate) name: String,
    pub(crate) amount: f64,
    pub(crate) period: BudgetPeriod,
    pub(crate) start_date: DateTime<Utc>,
    pub(crate) end_date: Option<DateTime<Utc>>,
    pub(crate) alert_threshold: i32,
    pub(crate) category_id: Option<i64>,
}

/// Validated budget update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBudget {
    pub(crate) name: Option<String>,
    pub(crate) amount: Option<f64>,
    pub(crate) period: Option<BudgetPeriod>,
    pub(crate) end_date: Option<DateTime<Utc>>,
    pub(crate) alert_threshold: Option<i32>,
    pub(crate) is_active: Option<bool>,
    pub(crate) category_id: Option<i64>,
}

impl Violations {
    fn period(&mut self, value: &str) -> Option<BudgetPeriod> {
        let period = BudgetPeriod::parse(value.trim());
        if period.is_none() {
            self.push(
                "period",
                "enum",
                "period must be one of: daily, weekly, monthly, yearly",
            );
        }
        period
    }

    fn alert_threshold(&mut self, value: i32) -> i32 {
        if !(1..=100).contains(&value) {
            self.push(
                "alert_threshold",
                "range",
                "alert_threshold must be between 1 and 100",
            );
        }
        value
    }

    /// Records the cross-field rule that a window must not be empty.
    pub(crate) fn window(&mut self, start: DateTime<Utc>, end: Option<DateTime<Utc>>) {
        if end.is_some_and(|end| end <= start) {
            self.push(
                "end_date",
                "after_start",
                "end_date must be after start_date",
            );
        }
    }
}

impl BudgetCreateRequest {
    /// Validates against an explicit clock, used for the default start date.
    pub fn validate_at(self, now: DateTime<Utc>) -> Result<CreateBudget, ValidationFailure> {
        let mut v = Violations::default();
        let name = v.text("name", &self.name, 1, NAME_MAX);
        let amount = v.amount("amount", self.amount, BUDGET_AMOUNT_MAX);
        let period = v.period(&self.period);
        let start_date = match self.start_date.as_deref() {
            Some(raw) => v.datetime("start_date", raw),
            None => Some(now),
        };
        let end_date = self
            .end_date
            .as_deref()
            .and_then(|d| v.datetime("end_date", d));
        let alert_threshold =
            v.alert_threshold(self.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD));
        let category_id = self.category_id.map(|id| v.id("category_id", id));
        if let Some(start) = start_date {
            v.window(start, end_date);
        }

        let command = CreateBudget {
            name,
            amount,
            period: period.unwrap_or(BudgetPeriod::Monthly),
            start_date: start_date.unwrap_or(now),
            end_date,
            alert_threshold,
            category_id,
        };
        v.finish(command)
    }
}

impl Validate for BudgetCreateRequest {
    type Command = CreateBudget;

    fn validate(self) -> Result<CreateBudget, ValidationFailure> {
        self.validate_at(Utc::now())
    }
}

impl Validate for BudgetUpdateRequest {
    type Command = UpdateBudget;

    fn validate(self) -> Result<UpdateBudget, ValidationFailure> {
        let mut v = Violations::default();
        let name = self.name.map(|n| v.text("name", &n, 1, NAME_MAX));
        let amount = self
            .amount
            .map(|a| v.amount("amount", a, BUDGET_AMOUNT_MAX));
        let period = self.period.and_then(|p| v.period(&p));
        let end_date = self
            .end_date
            .as_deref()
            .and_then(|d| v.datetime("end_date", d));
        let alert_threshold = self.alert_threshold.map(|t| v.alert_threshold(t));
        let category_id = self.category_id.map(|id| v.id("category_id", id));
        v.finish(UpdateBudget {
            name,
            amount,
            period,
            end_date,
            alert_threshold,
            is_active: self.is_active,
            category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::TimeZone;

    fn request() -> BudgetCreateRequest {
        BudgetCreateRequest {
            name: "Monthly Food Budget".to_string(),
            amount: 500.0,
            period: "monthly".to_string(),
            start_date: Some("2024-01-01T00:00:00".to_string()),
            end_date: Some("2024-01-31T23:59:59".to_string()),
            alert_threshold: None,
            category_id: Some(1),
        }
    }

    #[test]
    fn test_create_budget_defaults() {
        let cmd = request().validate().unwrap();
        assert_eq!(cmd.alert_threshold, DEFAULT_ALERT_THRESHOLD);
        assert_eq!(cmd.period, BudgetPeriod::Monthly);
        assert_eq!(
            cmd.start_date,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_start_date_defaults_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut req = request();
        req.start_date = None;
        req.end_date = None;
        assert_eq!(req.validate_at(now).unwrap().start_date, now);
    }

    #[test]
    fn test_end_date_before_start_date_cites_end_date() {
        let mut req = request();
        req.end_date = Some("2023-12-31".to_string());
        let failure = req.validate().unwrap_err();
        assert_eq!(failure.errors().len(), 1);
        assert_eq!(failure.errors()[0].field, "end_date");
        assert_eq!(failure.errors()[0].code, "after_start");
    }

    #[test]
    fn test_end_date_equal_to_start_date_rejected() {
        let mut req = request();
        req.end_date = req.start_date.clone();
        let failure = req.validate().unwrap_err();
        assert!(failure.has_field("end_date"));
    }

    #[test]
    fn test_enum_and_threshold_violations_reported_together() {
        let mut req = request();
        req.period = "hourly".to_string();
        req.alert_threshold = Some(0);
        req.amount = 10_000_000.0;
        let failure = req.validate().unwrap_err();
        assert!(failure.has_field("period"));
        assert!(failure.has_field("alert_threshold"));
        assert!(failure.has_field("amount"));
    }

    #[test]
    fn test_malformed_start_date_reported_once() {
        let mut req = request();
        req.start_date = Some("soon".to_string());
        let failure = req.validate().unwrap_err();
        assert_eq!(failure.errors().len(), 1);
        assert_eq!(failure.errors()[0].field, "start_date");
    }

    #[test]
    fn test_update_budget_partial() {
        let cmd = BudgetUpdateRequest {
            amount: Some(600.0),
            alert_threshold: Some(75),
            is_active: Some(true),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(cmd.amount, Some(600.0));
        assert_eq!(cmd.alert_threshold, Some(75));
        assert_eq!(cmd.is_active, Some(true));
        assert_eq!(cmd.name, None);
        assert_eq!(cmd.end_date, None);
    }

    #[test]
    fn test_update_budget_rejects_bad_threshold() {
        let failure = BudgetUpdateRequest {
            alert_threshold: Some(101),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(failure.has_field("alert_threshold"));
    }
}
