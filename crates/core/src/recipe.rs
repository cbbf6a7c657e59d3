//! Canonical recipe view model.
//!
//! Every recipe the rest of the system handles has this shape, whichever source it came
//! from. The [`crate::normalize`] module is the only place that builds one from raw data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a recipe came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Authored by a user and stored in the document store.
    Custom,
    /// Fetched from the remote meal database; read-only.
    External,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Custom => "custom",
            Origin::External => "external",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub cuisine_area: String,
    pub image_url: String,
    /// Ordered steps, each trimmed and ending in a period.
    pub instructions: Vec<String>,
    pub ingredients: Vec<Ingredient>,
    pub source_url: Option<String>,
    pub origin: Origin,
    /// Set only for [`Origin::Custom`] recipes.
    pub owner_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Recipe {
    pub fn is_custom(&self) -> bool {
        self.origin == Origin::Custom
    }

    /// True when `uid` authored this recipe. External recipes have no owner.
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.is_custom() && self.owner_id.as_deref() == Some(uid)
    }
}

/// One ingredient row as authored and stored for a custom recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(default)]
    pub ingredient: String,
    #[serde(default)]
    pub measure: String,
}
