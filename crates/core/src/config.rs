//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in this crate reads environment variables during request handling; binaries
//! read them and hand the raw values to the `*_from_env_value` helpers below, which keeps
//! the parsing testable without mutating the process environment.

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL, DEFAULT_MEAL_API_URL,
    DEFAULT_MIN_REQUEST_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
};
use crate::{RecipeError, RecipeResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    meal_api_url: String,
    cache_ttl: Duration,
    cache_capacity: Option<usize>,
    min_request_interval: Duration,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// A `cache_capacity` of `None` leaves the response cache unbounded.
    pub fn new(
        meal_api_url: impl Into<String>,
        cache_ttl: Duration,
        cache_capacity: Option<usize>,
        min_request_interval: Duration,
        request_timeout: Duration,
    ) -> RecipeResult<Self> {
        let meal_api_url = meal_api_url.into().trim().trim_end_matches('/').to_string();
        if meal_api_url.is_empty() {
            return Err(RecipeError::InvalidInput(
                "meal API URL cannot be empty".into(),
            ));
        }
        if !(meal_api_url.starts_with("http://") || meal_api_url.starts_with("https://")) {
            return Err(RecipeError::InvalidInput(
                "meal API URL must start with http:// or https://".into(),
            ));
        }
        if cache_ttl.is_zero() {
            return Err(RecipeError::InvalidInput(
                "cache TTL must be greater than zero".into(),
            ));
        }
        if cache_capacity == Some(0) {
            return Err(RecipeError::InvalidInput(
                "cache capacity must be greater than zero".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(RecipeError::InvalidInput(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            meal_api_url,
            cache_ttl,
            cache_capacity,
            min_request_interval,
            request_timeout,
        })
    }

    pub fn meal_api_url(&self) -> &str {
        &self.meal_api_url
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn cache_capacity(&self) -> Option<usize> {
        self.cache_capacity
    }

    pub fn min_request_interval(&self) -> Duration {
        self.min_request_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            meal_api_url: DEFAULT_MEAL_API_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: Some(DEFAULT_CACHE_CAPACITY),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_u64(name: &str, value: &str) -> RecipeResult<u64> {
    value
        .parse::<u64>()
        .map_err(|e| RecipeError::InvalidInput(format!("{name} must be a whole number: {e}")))
}

/// Parse a duration given in whole seconds, falling back to `default` when unset or blank.
pub fn duration_secs_from_env_value(
    name: &str,
    value: Option<String>,
    default: Duration,
) -> RecipeResult<Duration> {
    match non_blank(value) {
        Some(v) => Ok(Duration::from_secs(parse_u64(name, &v)?)),
        None => Ok(default),
    }
}

/// Parse a duration given in milliseconds, falling back to `default` when unset or blank.
pub fn duration_millis_from_env_value(
    name: &str,
    value: Option<String>,
    default: Duration,
) -> RecipeResult<Duration> {
    match non_blank(value) {
        Some(v) => Ok(Duration::from_millis(parse_u64(name, &v)?)),
        None => Ok(default),
    }
}

/// Parse the cache capacity.
///
/// Unset or blank means the default bound; the literal `unbounded` disables the bound.
pub fn cache_capacity_from_env_value(value: Option<String>) -> RecipeResult<Option<usize>> {
    match non_blank(value) {
        None => Ok(Some(DEFAULT_CACHE_CAPACITY)),
        Some(v) if v.eq_ignore_ascii_case("unbounded") => Ok(None),
        Some(v) => {
            let capacity = parse_u64("CACHE_CAPACITY", &v)?;
            usize::try_from(capacity)
                .map(Some)
                .map_err(|_| RecipeError::InvalidInput("CACHE_CAPACITY is too large".into()))
        }
    }
}

/// Resolve the meal API base URL, defaulting to the public meal database.
pub fn meal_api_url_from_env_value(value: Option<String>) -> String {
    non_blank(value).unwrap_or_else(|| DEFAULT_MEAL_API_URL.to_string())
}

/// Builds a [`CoreConfig`] from named raw values.
///
/// Binaries pass `|name| std::env::var(name).ok()`. Recognised names are `MEAL_API_URL`,
/// `CACHE_TTL_SECS`, `CACHE_CAPACITY`, `MIN_REQUEST_INTERVAL_MS` and `REQUEST_TIMEOUT_SECS`.
pub fn config_from_env_values(lookup: impl Fn(&str) -> Option<String>) -> RecipeResult<CoreConfig> {
    CoreConfig::new(
        meal_api_url_from_env_value(lookup("MEAL_API_URL")),
        duration_secs_from_env_value("CACHE_TTL_SECS", lookup("CACHE_TTL_SECS"), DEFAULT_CACHE_TTL)?,
        cache_capacity_from_env_value(lookup("CACHE_CAPACITY"))?,
        duration_millis_from_env_value(
            "MIN_REQUEST_INTERVAL_MS",
            lookup("MIN_REQUEST_INTERVAL_MS"),
            DEFAULT_MIN_REQUEST_INTERVAL,
        )?,
        duration_secs_from_env_value(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            DEFAULT_REQUEST_TIMEOUT,
        )?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let cfg = CoreConfig::new(
            "https://example.test/api/",
            DEFAULT_CACHE_TTL,
            None,
            DEFAULT_MIN_REQUEST_INTERVAL,
            DEFAULT_REQUEST_TIMEOUT,
        )
        .expect("valid config");
        assert_eq!(cfg.meal_api_url(), "https://example.test/api");
        assert_eq!(cfg.cache_capacity(), None);
    }

    #[test]
    fn new_rejects_non_http_url() {
        let err = CoreConfig::new(
            "ftp://example.test",
            DEFAULT_CACHE_TTL,
            None,
            DEFAULT_MIN_REQUEST_INTERVAL,
            DEFAULT_REQUEST_TIMEOUT,
        )
        .expect_err("should reject ftp");
        assert!(matches!(err, RecipeError::InvalidInput(_)));
    }

    #[test]
    fn new_rejects_zero_capacity() {
        let err = CoreConfig::new(
            DEFAULT_MEAL_API_URL,
            DEFAULT_CACHE_TTL,
            Some(0),
            DEFAULT_MIN_REQUEST_INTERVAL,
            DEFAULT_REQUEST_TIMEOUT,
        )
        .expect_err("should reject zero capacity");
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn default_matches_documented_limits() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(86_400));
        assert_eq!(cfg.min_request_interval(), Duration::from_secs(6));
        assert_eq!(cfg.cache_capacity(), Some(DEFAULT_CACHE_CAPACITY));
    }

    #[test]
    fn durations_fall_back_when_blank() {
        let d =
            duration_secs_from_env_value("CACHE_TTL_SECS", Some("  ".into()), DEFAULT_CACHE_TTL)
                .unwrap();
        assert_eq!(d, DEFAULT_CACHE_TTL);

        let d = duration_millis_from_env_value(
            "MIN_REQUEST_INTERVAL_MS",
            Some("250".into()),
            DEFAULT_MIN_REQUEST_INTERVAL,
        )
        .unwrap();
        assert_eq!(d, Duration::from_millis(250));
    }

    #[test]
    fn durations_reject_garbage() {
        let err =
            duration_secs_from_env_value("CACHE_TTL_SECS", Some("soon".into()), DEFAULT_CACHE_TTL)
                .expect_err("should reject non-numeric");
        assert!(err.to_string().contains("CACHE_TTL_SECS"));
    }

    #[test]
    fn capacity_parses_unbounded_keyword() {
        assert_eq!(
            cache_capacity_from_env_value(Some("UNBOUNDED".into())).unwrap(),
            None
        );
        assert_eq!(
            cache_capacity_from_env_value(Some("42".into())).unwrap(),
            Some(42)
        );
        assert_eq!(
            cache_capacity_from_env_value(None).unwrap(),
            Some(DEFAULT_CACHE_CAPACITY)
        );
    }

    #[test]
    fn meal_api_url_defaults_when_unset() {
        assert_eq!(meal_api_url_from_env_value(None), DEFAULT_MEAL_API_URL);
        assert_eq!(
            meal_api_url_from_env_value(Some("http://localhost:9000".into())),
            "http://localhost:9000"
        );
    }

    #[test]
    fn config_from_env_values_applies_overrides_and_defaults() {
        let cfg = config_from_env_values(|name| match name {
            "MEAL_API_URL" => Some("http://localhost:9000/".into()),
            "MIN_REQUEST_INTERVAL_MS" => Some("0".into()),
            "CACHE_CAPACITY" => Some("unbounded".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(cfg.meal_api_url(), "http://localhost:9000");
        assert_eq!(cfg.min_request_interval(), Duration::ZERO);
        assert_eq!(cfg.cache_capacity(), None);
        assert_eq!(cfg.cache_ttl(), DEFAULT_CACHE_TTL);
        assert_eq!(cfg.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn config_from_env_values_rejects_zero_ttl() {
        let err = config_from_env_values(|name| (name == "CACHE_TTL_SECS").then(|| "0".into()))
            .unwrap_err();
        assert!(err.to_string().contains("TTL"));
    }
}
