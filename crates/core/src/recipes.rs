//! User-authored recipes.
//!
//! Create, update, delete and "my recipes" listing for the `recipes` collection. Every write
//! checks identity and ownership here, independently of what the presentation layer was
//! shown by [`crate::guard::capabilities`].

use crate::auth::Identity;
use crate::constants::RECIPES_COLLECTION;
use crate::error::{RecipeError, RecipeResult};
use crate::guard::{ensure_owner_id, require_identity};
use crate::normalize::{normalize, normalize_batch, RawRecipe, CUSTOM_MARKER};
use crate::recipe::{IngredientLine, Recipe};
use crate::store::{DocumentStore, Filter};
use chrono::{DateTime, Utc};
use recipe_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

const MAX_TITLE_LEN: usize = 200;

/// The editable fields of a custom recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub source: String,
}

impl RecipeDraft {
    fn validated(mut self) -> RecipeResult<Self> {
        self.title = NonEmptyText::bounded(&self.title, MAX_TITLE_LEN)?.into_inner();
        if self.ingredients.is_empty() {
            return Err(RecipeError::InvalidInput(
                "a recipe needs at least one ingredient".into(),
            ));
        }
        Ok(self)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewRecipeDoc<'a> {
    #[serde(flatten)]
    draft: &'a RecipeDraft,
    created_by: &'a str,
    created_at: DateTime<Utc>,
    is_custom: bool,
}

#[derive(Clone)]
pub struct RecipeService {
    store: Arc<dyn DocumentStore>,
}

impl RecipeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        identity: Option<&Identity>,
        draft: RecipeDraft,
    ) -> RecipeResult<Recipe> {
        let identity = require_identity(identity)?;
        let draft = draft.validated()?;

        let doc = serde_json::to_value(NewRecipeDoc {
            draft: &draft,
            created_by: &identity.uid,
            created_at: Utc::now(),
            is_custom: true,
        })
        .map_err(RecipeError::Serialization)?;

        let id = self.store.create(RECIPES_COLLECTION, doc.clone()).await?;
        tracing::info!(recipe_id = %id, uid = %identity.uid, "recipe created");

        normalize(RawRecipe::Custom { id: Some(id), doc })
    }

    pub async fn update(
        &self,
        identity: Option<&Identity>,
        id: &str,
        draft: RecipeDraft,
    ) -> RecipeResult<Recipe> {
        let identity = require_identity(identity)?;
        let existing = self.load(id).await?;
        ensure_owner_id(Some(identity), created_by(&existing))?;
        let draft = draft.validated()?;

        let mut patch = serde_json::to_value(&draft).map_err(RecipeError::Serialization)?;
        if let Value::Object(fields) = &mut patch {
            fields.insert("updatedAt".into(), Value::String(Utc::now().to_rfc3339()));
            fields.insert(CUSTOM_MARKER.into(), Value::Bool(true));
        }
        self.store.update(RECIPES_COLLECTION, id, patch).await?;
        tracing::info!(recipe_id = %id, uid = %identity.uid, "recipe updated");

        let updated = self.load(id).await?;
        normalize(RawRecipe::Custom {
            id: Some(id.to_string()),
            doc: updated,
        })
    }

    pub async fn delete(&self, identity: Option<&Identity>, id: &str) -> RecipeResult<()> {
        let identity = require_identity(identity)?;
        let existing = self.load(id).await?;
        ensure_owner_id(Some(identity), created_by(&existing))?;

        self.store.delete(RECIPES_COLLECTION, id).await?;
        tracing::info!(recipe_id = %id, uid = %identity.uid, "recipe deleted");
        Ok(())
    }

    /// Recipes authored by the signed-in user. Malformed documents are skipped.
    pub async fn list_mine(&self, identity: Option<&Identity>) -> RecipeResult<Vec<Recipe>> {
        let identity = require_identity(identity)?;
        let docs = self
            .store
            .query(
                RECIPES_COLLECTION,
                &[Filter::eq("createdBy", identity.uid.as_str())],
            )
            .await?;

        let (recipes, skipped) = normalize_batch(docs.into_iter().map(|doc| RawRecipe::Custom {
            id: Some(doc.id),
            doc: doc.data,
        }));
        if skipped > 0 {
            tracing::warn!(uid = %identity.uid, skipped, "skipped malformed authored recipes");
        }
        Ok(recipes)
    }

    async fn load(&self, id: &str) -> RecipeResult<Value> {
        self.store
            .get(RECIPES_COLLECTION, id)
            .await?
            .ok_or_else(|| RecipeError::not_found(format!("recipe {id}")))
    }
}

fn created_by(doc: &Value) -> Option<&str> {
    doc.get("createdBy").and_then(Value::as_str)
}
