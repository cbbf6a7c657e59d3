//! # Recipebox Core
//!
//! Core logic for the recipe catalog:
//! - Normalization of user-authored and remote meal records into one [`Recipe`] shape
//! - Prefix search across the document store and the remote meal API
//! - A 24h response cache and a minimum-interval rate limiter in front of the meal API
//! - Ownership checks, authored recipes, favorites and profiles
//!
//! **No API concerns**: HTTP routing, request parsing and status codes belong in `api-rest`
//! and `api-shared`.

pub mod auth;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod favorites;
pub mod guard;
pub mod meal_api;
pub mod normalize;
pub mod profile;
pub mod rate_limiter;
pub mod recipe;
pub mod recipes;
pub mod search;
pub mod store;

#[cfg(test)]
mod testing;

pub use auth::{AuthService, Identity, MemoryAuth, Session};
pub use cache::ResponseCache;
pub use config::CoreConfig;
pub use error::{RecipeError, RecipeResult};
pub use favorites::{Favorite, FavoriteService};
pub use guard::Capabilities;
pub use meal_api::{HttpTransport, MealDbClient, MealTransport};
pub use profile::{ProfileService, UserProfile};
pub use rate_limiter::RateLimiter;
pub use recipe::{Ingredient, IngredientLine, Origin, Recipe};
pub use recipes::{RecipeDraft, RecipeService};
pub use search::{SearchAggregator, SearchOutcome};
pub use store::{DocumentStore, MemoryStore};
