//! Per-recipe capability flags for the presentation layer.
//!
//! [`capabilities`] is advisory: it decides which buttons to show. The write paths in
//! [`crate::recipes`] and [`crate::favorites`] re-check with [`ensure_owner`] and
//! [`require_identity`] before touching the store.

use crate::auth::Identity;
use crate::error::{RecipeError, RecipeResult};
use crate::recipe::Recipe;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_favorite: bool,
}

pub fn capabilities(identity: Option<&Identity>, recipe: &Recipe) -> Capabilities {
    let Some(identity) = identity else {
        return Capabilities::default();
    };

    let owns = recipe.is_owned_by(&identity.uid);
    Capabilities {
        can_edit: owns,
        can_delete: owns,
        can_favorite: true,
    }
}

pub fn require_identity(identity: Option<&Identity>) -> RecipeResult<&Identity> {
    identity.ok_or(RecipeError::Unauthenticated)
}

/// Fails unless `identity` is present and authored `recipe`.
pub fn ensure_owner<'a>(
    identity: Option<&'a Identity>,
    recipe: &Recipe,
) -> RecipeResult<&'a Identity> {
    let owner_id = recipe.owner_id.as_deref().filter(|_| recipe.is_custom());
    ensure_owner_id(identity, owner_id)
}

/// Ownership check against a raw `createdBy` value, for documents that may not normalize.
pub fn ensure_owner_id<'a>(
    identity: Option<&'a Identity>,
    owner_id: Option<&str>,
) -> RecipeResult<&'a Identity> {
    let identity = require_identity(identity)?;
    if owner_id == Some(identity.uid.as_str()) {
        Ok(identity)
    } else {
        Err(RecipeError::PermissionDenied)
    }
}
