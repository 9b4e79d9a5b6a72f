//! Category record and color palette.
//!
//! # Invariants
//! - `name` is stored trimmed and is never blank.
//! - `color` is always a `#RRGGBB` hex string.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a category.
pub type CategoryId = Uuid;

/// Display name used for tasks without a (resolvable) category.
pub const NO_CATEGORY_LABEL: &str = "No Category";

/// Fixed palette used when a category is created without an explicit color.
pub const CATEGORY_COLORS: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E9",
];

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Returns the palette offered to users when picking a category color.
pub fn available_colors() -> &'static [&'static str] {
    &CATEGORY_COLORS
}

/// Picks the palette color for the `index`-th category, wrapping around.
pub fn palette_color(index: usize) -> &'static str {
    CATEGORY_COLORS[index % CATEGORY_COLORS.len()]
}

/// Invariant violation for category records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    InvalidColor(String),
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::InvalidColor(value) => {
                write!(f, "invalid category color `{value}`; expected #RRGGBB")
            }
        }
    }
}

impl Error for CategoryValidationError {}

/// A named, colored tag grouping tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    /// Falls back to a palette color when `None`.
    pub color: Option<String>,
}

impl CategoryDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }
}

/// Partial update for an existing category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl Category {
    /// Builds a category with a fresh id.
    ///
    /// `fallback_color` is used when the draft carries no color.
    pub fn from_draft(
        draft: CategoryDraft,
        fallback_color: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, CategoryValidationError> {
        let name = normalize_name(&draft.name)?;
        let color = match draft.color {
            Some(color) => normalize_color(&color)?,
            None => fallback_color.to_string(),
        };
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            color,
            created_at: now,
        })
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        normalize_name(&self.name)?;
        normalize_color(&self.color)?;
        Ok(())
    }

    /// Applies `patch`; the category is untouched when any field is invalid.
    pub fn apply_patch(&mut self, patch: CategoryPatch) -> Result<(), CategoryValidationError> {
        let name = patch.name.as_deref().map(normalize_name).transpose()?;
        let color = patch.color.as_deref().map(normalize_color).transpose()?;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(color) = color {
            self.color = color;
        }
        Ok(())
    }
}

fn normalize_name(name: &str) -> Result<String, CategoryValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn normalize_color(color: &str) -> Result<String, CategoryValidationError> {
    let trimmed = color.trim();
    if !HEX_COLOR_RE.is_match(trimmed) {
        return Err(CategoryValidationError::InvalidColor(color.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
