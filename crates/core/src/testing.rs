//! Test doubles shared by the unit tests in this crate.

use crate::auth::Identity;
use crate::cache::ResponseCache;
use crate::error::{RecipeError, RecipeResult};
use crate::meal_api::{MealDbClient, MealRequest, MealTransport};
use crate::rate_limiter::RateLimiter;
use crate::store::{Document, DocumentStore, Filter, MemoryStore};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Serves canned bodies keyed by cache key; anything else is an HTTP 500.
#[derive(Default)]
pub struct FakeTransport {
    bodies: HashMap<String, String>,
    calls: Mutex<Vec<MealRequest>>,
}

impl FakeTransport {
    pub fn with(mut self, request: MealRequest, body: impl Into<String>) -> Self {
        self.bodies.insert(request.cache_key(), body.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MealTransport for FakeTransport {
    async fn fetch(&self, request: &MealRequest) -> RecipeResult<String> {
        self.calls.lock().unwrap().push(request.clone());
        self.bodies
            .get(&request.cache_key())
            .cloned()
            .ok_or_else(|| RecipeError::NetworkFailure("HTTP 500".into()))
    }
}

/// A client with a 24h cache and no request spacing.
pub fn meal_client(transport: FakeTransport) -> MealDbClient<FakeTransport> {
    MealDbClient::new(
        transport,
        ResponseCache::new(Duration::from_secs(24 * 60 * 60), None),
        RateLimiter::new(Duration::ZERO),
    )
}

/// Wraps [`MemoryStore`] and counts every call made through the trait.
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn create(&self, collection: &str, doc: Value) -> RecipeResult<String> {
        self.tick();
        self.inner.create(collection, doc).await
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> RecipeResult<()> {
        self.tick();
        self.inner.set(collection, id, doc).await
    }

    async fn get(&self, collection: &str, id: &str) -> RecipeResult<Option<Value>> {
        self.tick();
        self.inner.get(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> RecipeResult<()> {
        self.tick();
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> RecipeResult<()> {
        self.tick();
        self.inner.delete(collection, id).await
    }

    async fn query(&self, collection: &str, filters: &[Filter]) -> RecipeResult<Vec<Document>> {
        self.tick();
        self.inner.query(collection, filters).await
    }
}

pub fn identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email_verified: true,
        creation_time: Utc::now(),
    }
}

/// A well-formed custom document as the recipe service would store it.
pub fn custom_doc(title: &str, owner: &str) -> Value {
    json!({
        "title": title,
        "description": "",
        "category": "Pasta",
        "area": "Italian",
        "image": "",
        "ingredients": [{"ingredient": "Penne", "measure": "400g"}],
        "instructions": "Boil pasta. Bake.",
        "source": "",
        "createdBy": owner,
        "createdAt": "2024-05-01T10:00:00Z",
        "isCustom": true
    })
}

/// A meal object in the remote API's shape with a single ingredient.
pub fn external_meal(id: &str, name: &str) -> Value {
    json!({
        "idMeal": id,
        "strMeal": name,
        "strCategory": "Pasta",
        "strArea": "Italian",
        "strMealThumb": "https://img.test/meal.jpg",
        "strSource": null,
        "strInstructions": "Cook. Serve.",
        "strIngredient1": "Penne",
        "strMeasure1": "1 pound"
    })
}

/// Wraps meals in the remote API's envelope.
pub fn meals_body(meals: &[Value]) -> String {
    if meals.is_empty() {
        return r#"{"meals":null}"#.to_string();
    }
    json!({ "meals": meals }).to_string()
}
