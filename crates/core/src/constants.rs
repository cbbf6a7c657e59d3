//! Constants used throughout the recipebox core crate.
//!
//! Collection names, remote endpoint names and the default tuning values live here so the
//! store queries, cache keys and config defaults stay consistent.

use std::time::Duration;

/// Collection holding user-authored recipes.
pub const RECIPES_COLLECTION: &str = "recipes";

/// Collection holding favorites, keyed `{uid}_{recipeId}`.
pub const FAVORITES_COLLECTION: &str = "favorites";

/// Collection holding user profiles, keyed by uid.
pub const USERS_COLLECTION: &str = "users";

/// Default base URL of the public meal database API.
pub const DEFAULT_MEAL_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Remote endpoint for title search.
pub const SEARCH_ENDPOINT: &str = "search.php";

/// Remote endpoint for lookup by id.
pub const LOOKUP_ENDPOINT: &str = "lookup.php";

/// How long a cached remote response stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on cached remote responses.
pub const DEFAULT_CACHE_CAPACITY: usize = 500;

/// Minimum spacing between outbound remote calls (10 per minute).
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(6);

/// Timeout for a single outbound remote call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of paired `strIngredientN` / `strMeasureN` fields on an external record.
pub const EXTERNAL_INGREDIENT_SLOTS: usize = 20;

/// Appended to a search term to form the upper bound of a prefix range query.
pub const PREFIX_SENTINEL: char = '\u{f8ff}';

/// Maximum accepted length of a search term, in characters.
pub const MAX_QUERY_LEN: usize = 200;
