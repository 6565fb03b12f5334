//! User payload validation.

use super::{Validate, ValidationFailure, Violations};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const EMAIL_MAX: usize = 120;
const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 80;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 100;
const NAME_MAX: usize = 50;

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid email regex"));

/// Raw sign-up payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserCreateRequest {
    /// Email address
    pub email: String,
    /// Desired username
    pub username: String,
    /// Plain-text password, hashed by the store
    pub password: String,
    /// Optional given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Optional family name
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Raw partial update payload. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateRequest {
    /// New email address
    #[serde(default)]
    pub email: Option<String>,
    /// New username
    #[serde(default)]
    pub username: Option<String>,
    /// New given name; blank clears it
    #[serde(default)]
    pub first_name: Option<String>,
    /// New family name; blank clears it
    #[serde(default)]
    pub last_name: Option<String>,
    /// Enable or disable the account
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Validated user creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub(crate) email: String,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
}

/// Validated user update. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub(crate) email: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) first_name: Option<Option<String>>,
    pub(crate) last_name: Option<Option<String>>,
    pub(crate) is_active: Option<bool>,
}

impl Violations {
    fn email(&mut self, value: &str) -> String {
        let email = self.text("email", value, 1, EMAIL_MAX).to_lowercase();
        if !email.is_empty() && !EMAIL_PATTERN.is_match(&email) {
            self.push("email", "email", "email must be a valid email address");
        }
        email
    }

    fn username(&mut self, value: &str) -> String {
        let username = self
            .text("username", value, USERNAME_MIN, USERNAME_MAX)
            .to_lowercase();
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.push(
                "username",
                "pattern",
                "username can only contain letters, numbers, and underscores",
            );
        }
        username
    }

    fn password(&mut self, value: &str) {
        let len = value.chars().count();
        if len < PASSWORD_MIN {
            self.push(
                "password",
                "min_length",
                format!("password must be at least {PASSWORD_MIN} characters"),
            );
        } else if len > PASSWORD_MAX {
            self.push(
                "password",
                "max_length",
                format!("password must be at most {PASSWORD_MAX} characters"),
            );
        }
        if !value.chars().any(|c| c.is_ascii_digit()) {
            self.push(
                "password",
                "digit_required",
                "password must contain at least one digit",
            );
        }
        if !value.chars().any(char::is_alphabetic) {
            self.push(
                "password",
                "letter_required",
                "password must contain at least one letter",
            );
        }
    }
}

impl Validate for UserCreateRequest {
    type Command = CreateUser;

    fn validate(self) -> Result<CreateUser, ValidationFailure> {
        let mut v = Violations::default();
        let email = v.email(&self.email);
        let username = v.username(&self.username);
        v.password(&self.password);
        let first_name = v.optional_text("first_name", self.first_name, NAME_MAX);
        let last_name = v.optional_text("last_name", self.last_name, NAME_MAX);
        v.finish(CreateUser {
            email,
            username,
            password: self.password,
            first_name,
            last_name,
        })
    }
}

impl Validate for UserUpdateRequest {
    type Command = UpdateUser;

    fn validate(self) -> Result<UpdateUser, ValidationFailure> {
        let mut v = Violations::default();
        let email = self.email.map(|e| v.email(&e));
        let username = self.username.map(|u| v.username(&u));
        let first_name = self
            .first_name
            .map(|n| v.optional_text("first_name", Some(n), NAME_MAX));
        let last_name = self
            .last_name
            .map(|n| v.optional_text("last_name", Some(n), NAME_MAX));
        v.finish(UpdateUser {
            email,
            username,
            first_name,
            last_name,
            is_active: self.is_active,
        })
    }
}
