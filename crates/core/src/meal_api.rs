//! Client for the public meal database API.
//!
//! Two endpoints are used: `search.php?s={term}` and `lookup.php?i={id}`. Both return
//! `{"meals": [...] | null}`, where `null` means no matches.
//!
//! Every call goes through the same gate: response cache first, and only on a miss the
//! rate limiter, the HTTP call, and a cache write. Only bodies that parse as a meals
//! envelope are cached. Two concurrent misses for the same key may both reach the API;
//! the second write simply replaces the first.

use crate::cache::{cache_key, ResponseCache};
use crate::config::CoreConfig;
use crate::constants::{LOOKUP_ENDPOINT, SEARCH_ENDPOINT};
use crate::error::{RecipeError, RecipeResult};
use crate::rate_limiter::RateLimiter;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// A normalised outbound request: one endpoint, one query parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MealRequest {
    pub endpoint: &'static str,
    pub param: &'static str,
    pub value: String,
}

impl MealRequest {
    pub fn search(term: &str) -> Self {
        Self {
            endpoint: SEARCH_ENDPOINT,
            param: "s",
            value: term.to_string(),
        }
    }

    pub fn lookup(id: &str) -> Self {
        Self {
            endpoint: LOOKUP_ENDPOINT,
            param: "i",
            value: id.to_string(),
        }
    }

    pub fn cache_key(&self) -> String {
        cache_key(self.endpoint, self.param, &self.value)
    }
}

/// Performs the raw HTTP exchange and returns the response body.
#[async_trait]
pub trait MealTransport: Send + Sync {
    async fn fetch(&self, request: &MealRequest) -> RecipeResult<String>;
}

#[async_trait]
impl MealTransport for Box<dyn MealTransport> {
    async fn fetch(&self, request: &MealRequest) -> RecipeResult<String> {
        (**self).fetch(request).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> RecipeResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RecipeError::NetworkFailure(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MealTransport for HttpTransport {
    async fn fetch(&self, request: &MealRequest) -> RecipeResult<String> {
        let url = format!("{}/{}", self.base_url, request.endpoint);
        tracing::debug!(%url, param = request.param, value = %request.value, "calling meal API");

        let body = self
            .client
            .get(&url)
            .query(&[(request.param, request.value.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(body)
    }
}

#[derive(Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<Value>>,
}

fn parse_meals(body: &str) -> RecipeResult<Vec<Value>> {
    let envelope: MealsEnvelope = serde_json::from_str(body).map_err(|e| {
        RecipeError::NetworkFailure(format!("unexpected meal API response: {e}"))
    })?;
    Ok(envelope.meals.unwrap_or_default())
}

pub struct MealDbClient<T> {
    transport: T,
    cache: ResponseCache,
    limiter: RateLimiter,
}

impl MealDbClient<HttpTransport> {
    /// Builds an HTTP-backed client with cache and limiter sized from `cfg`.
    pub fn from_config(cfg: &CoreConfig) -> RecipeResult<Self> {
        let transport = HttpTransport::new(cfg.meal_api_url(), cfg.request_timeout())?;
        Ok(Self::new(
            transport,
            ResponseCache::new(cfg.cache_ttl(), cfg.cache_capacity()),
            RateLimiter::new(cfg.min_request_interval()),
        ))
    }
}

impl<T: MealTransport> MealDbClient<T> {
    pub fn new(transport: T, cache: ResponseCache, limiter: RateLimiter) -> Self {
        Self {
            transport,
            cache,
            limiter,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Erases the transport type, keeping the cache and limiter.
    pub fn boxed(self) -> MealDbClient<Box<dyn MealTransport>>
    where
        T: 'static,
    {
        MealDbClient {
            transport: Box::new(self.transport),
            cache: self.cache,
            limiter: self.limiter,
        }
    }

    /// Raw meal objects whose name matches `term`.
    pub async fn search(&self, term: &str) -> RecipeResult<Vec<Value>> {
        self.fetch_meals(&MealRequest::search(term)).await
    }

    /// The raw meal object with id `id`, if the API knows it.
    pub async fn lookup(&self, id: &str) -> RecipeResult<Option<Value>> {
        let meals = self.fetch_meals(&MealRequest::lookup(id)).await?;
        Ok(meals.into_iter().next())
    }

    async fn fetch_meals(&self, request: &MealRequest) -> RecipeResult<Vec<Value>> {
        let key = request.cache_key();
        if let Some(body) = self.cache.get(&key) {
            return parse_meals(&body);
        }

        self.limiter.acquire().await;
        let body = self.transport.fetch(request).await.inspect_err(|e| {
            tracing::warn!(%key, "meal API call failed: {e}");
        })?;

        let meals = parse_meals(&body)?;
        self.cache.put(key, body);
        Ok(meals)
    }
}
