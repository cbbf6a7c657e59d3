//! Per-user favorites.
//!
//! A favorite lives in the `favorites` collection under the deterministic id
//! `{uid}_{recipeId}`, so a user can favorite a recipe at most once. Each record carries a
//! snapshot of the recipe taken when it was favorited; later edits or deletion of the
//! recipe do not touch existing snapshots.

use crate::auth::Identity;
use crate::constants::FAVORITES_COLLECTION;
use crate::error::{RecipeError, RecipeResult};
use crate::guard::require_identity;
use crate::recipe::Recipe;
use crate::store::{DocumentStore, Filter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    pub recipe_snapshot: Recipe,
    pub added_at: DateTime<Utc>,
}

pub fn favorite_id(uid: &str, recipe_id: &str) -> String {
    format!("{uid}_{recipe_id}")
}

#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn DocumentStore>,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Adds `recipe` to the user's favorites, or removes it if already present.
    ///
    /// Returns whether the recipe is a favorite afterwards.
    pub async fn toggle(&self, identity: Option<&Identity>, recipe: &Recipe) -> RecipeResult<bool> {
        let identity = require_identity(identity)?;
        let id = favorite_id(&identity.uid, &recipe.id);

        if self.store.get(FAVORITES_COLLECTION, &id).await?.is_some() {
            self.store.delete(FAVORITES_COLLECTION, &id).await?;
            tracing::info!(uid = %identity.uid, recipe_id = %recipe.id, "favorite removed");
            return Ok(false);
        }

        let favorite = Favorite {
            id: id.clone(),
            user_id: identity.uid.clone(),
            recipe_id: recipe.id.clone(),
            recipe_snapshot: recipe.clone(),
            added_at: Utc::now(),
        };
        let doc = serde_json::to_value(&favorite).map_err(RecipeError::Serialization)?;
        self.store.set(FAVORITES_COLLECTION, &id, doc).await?;
        tracing::info!(uid = %identity.uid, recipe_id = %recipe.id, "favorite added");
        Ok(true)
    }

    /// Anonymous callers have no favorites.
    pub async fn is_favorite(
        &self,
        identity: Option<&Identity>,
        recipe_id: &str,
    ) -> RecipeResult<bool> {
        let Some(identity) = identity else {
            return Ok(false);
        };
        let id = favorite_id(&identity.uid, recipe_id);
        Ok(self.store.get(FAVORITES_COLLECTION, &id).await?.is_some())
    }

    pub async fn remove(&self, identity: Option<&Identity>, recipe_id: &str) -> RecipeResult<()> {
        let identity = require_identity(identity)?;
        let id = favorite_id(&identity.uid, recipe_id);
        self.store.delete(FAVORITES_COLLECTION, &id).await
    }

    /// The user's favorites, oldest first. Unreadable records are skipped.
    pub async fn list(&self, identity: Option<&Identity>) -> RecipeResult<Vec<Favorite>> {
        let identity = require_identity(identity)?;
        let docs = self
            .store
            .query(
                FAVORITES_COLLECTION,
                &[Filter::eq("userId", identity.uid.as_str())],
            )
            .await?;

        let mut favorites: Vec<Favorite> = docs
            .into_iter()
            .filter_map(|doc| match serde_json::from_value(doc.data) {
                Ok(favorite) => Some(favorite),
                Err(e) => {
                    tracing::warn!(favorite_id = %doc.id, "skipping unreadable favorite: {e}");
                    None
                }
            })
            .collect();
        favorites.sort_by_key(|f| f.added_at);
        Ok(favorites)
    }
}
