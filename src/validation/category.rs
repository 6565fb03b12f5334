//! Category payload validation.

use super::{Validate, ValidationFailure, Violations};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

const NAME_MAX: usize = 50;
const DESCRIPTION_MAX: usize = 500;
const ICON_MAX: usize = 50;

#[allow(clippy::expect_used)]
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex"));

/// Raw category creation payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryCreateRequest {
    /// Category name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Optional icon identifier or emoji
    #[serde(default)]
    pub icon: Option<String>,
    /// Optional `#RRGGBB` color
    #[serde(default)]
    pub color: Option<String>,
}

/// Raw partial category update. Absent fields stay unchanged, blank ones clear.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdateRequest {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New icon
    #[serde(default)]
    pub icon: Option<String>,
    /// New color
    #[serde(default)]
    pub color: Option<String>,
}

/// Validated category creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCategory {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) color: Option<String>,
}

/// Validated category update. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCategory {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<Option<String>>,
    pub(crate) icon: Option<Option<String>>,
    pub(crate) color: Option<Option<String>>,
}

impl Violations {
    fn color(&mut self, value: Option<String>) -> Option<String> {
        let color = value?.trim().to_string();
        if color.is_empty() {
            return None;
        }
        if !HEX_COLOR.is_match(&color) {
            self.push(
                "color",
                "pattern",
                "color must be a valid hex code (e.g., #FF5733)",
            );
        }
        Some(color.to_uppercase())
    }
}

impl Validate for CategoryCreateRequest {
    type Command = CreateCategory;

    fn validate(self) -> Result<CreateCategory, ValidationFailure> {
        let mut v = Violations::default();
        let name = v.text("name", &self.name, 1, NAME_MAX);
        let description = v.optional_text("description", self.description, DESCRIPTION_MAX);
        let icon = v.optional_text("icon", self.icon, ICON_MAX);
        let color = v.color(self.color);
        v.finish(CreateCategory {
            name,
            description,
            icon,
            color,
        })
    }
}

impl Validate for CategoryUpdateRequest {
    type Command = UpdateCategory;

    fn validate(self) -> Result<UpdateCategory, ValidationFailure> {
        let mut v = Violations::default();
        let name = self.name.map(|n| v.text("name", &n, 1, NAME_MAX));
        let description = self
            .description
            .map(|d| v.optional_text("description", Some(d), DESCRIPTION_MAX));
        let icon = self
            .icon
            .map(|i| v.optional_text("icon", Some(i), ICON_MAX));
        let color = self.color.map(|c| v.color(Some(c)));
        v.finish(UpdateCategory {
            name,
            description,
            icon,
            color,
        })
    }
}
