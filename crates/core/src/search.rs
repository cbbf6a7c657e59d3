//! Recipe search across the document store and the remote meal API.
//!
//! A search runs a case-sensitive title prefix query against the `recipes` collection and a
//! remote title search at the same time, normalizes both result sets, and returns local
//! recipes first followed by remote ones, each in its source's order. Results are not
//! deduplicated across sources.
//!
//! Either source failing fails the whole search. Individual malformed records are skipped
//! and counted instead.

use crate::constants::{MAX_QUERY_LEN, PREFIX_SENTINEL, RECIPES_COLLECTION};
use crate::error::{RecipeError, RecipeResult};
use crate::meal_api::{MealDbClient, MealTransport};
use crate::normalize::{normalize, normalize_batch, RawRecipe};
use crate::recipe::{Origin, Recipe};
use crate::store::{DocumentStore, Filter};
use recipe_types::NonEmptyText;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub recipes: Vec<Recipe>,
    /// Records dropped because they could not be normalized.
    pub skipped: usize,
}

pub struct SearchAggregator<T> {
    store: Arc<dyn DocumentStore>,
    meals: Arc<MealDbClient<T>>,
}

impl<T> Clone for SearchAggregator<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            meals: self.meals.clone(),
        }
    }
}

impl<T: MealTransport> SearchAggregator<T> {
    pub fn new(store: Arc<dyn DocumentStore>, meals: Arc<MealDbClient<T>>) -> Self {
        Self { store, meals }
    }

    pub fn meals(&self) -> &MealDbClient<T> {
        &self.meals
    }

    /// Searches both sources for recipes whose title starts with `query`.
    ///
    /// A blank query returns no results without touching either source.
    pub async fn search(&self, query: &str) -> RecipeResult<SearchOutcome> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::default());
        }
        let term = NonEmptyText::bounded(query, MAX_QUERY_LEN)?;

        let (local, remote) = tokio::try_join!(
            self.local_matches(&term),
            self.meals.search(term.as_str())
        )?;

        let records = local.into_iter().chain(remote.into_iter().map(RawRecipe::External));
        let (recipes, skipped) = normalize_batch(records);
        if skipped > 0 {
            tracing::warn!(query = %term, skipped, "search dropped malformed records");
        }
        tracing::debug!(query = %term, results = recipes.len(), "search complete");

        Ok(SearchOutcome { recipes, skipped })
    }

    async fn local_matches(&self, term: &NonEmptyText) -> RecipeResult<Vec<RawRecipe>> {
        let upper = format!("{term}{PREFIX_SENTINEL}");
        let docs = self
            .store
            .query(
                RECIPES_COLLECTION,
                &[
                    Filter::ge("title", term.as_str()),
                    Filter::le("title", upper),
                ],
            )
            .await?;

        Ok(docs
            .into_iter()
            .map(|doc| RawRecipe::from_value(Some(&doc.id), doc.data, Origin::Custom))
            .collect())
    }

    /// Loads one recipe by id: the document store first, then the remote API.
    pub async fn find_by_id(&self, id: &str) -> RecipeResult<Recipe> {
        let id = NonEmptyText::new(id)?;

        if let Some(doc) = self.store.get(RECIPES_COLLECTION, id.as_str()).await? {
            return normalize(RawRecipe::from_value(
                Some(id.as_str()),
                doc,
                Origin::Custom,
            ));
        }

        match self.meals.lookup(id.as_str()).await? {
            Some(meal) => normalize(RawRecipe::External(meal)),
            None => Err(RecipeError::not_found(format!("recipe {id}"))),
        }
    }
}
