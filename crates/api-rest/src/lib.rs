//! # API REST
//!
//! REST API implementation for Recipebox.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Bearer-token identity extraction and error-to-status mapping
//! - OpenAPI/Swagger documentation
//!
//! Uses `api-shared` for wire types and `recipebox-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod extract;
pub mod handlers;

use api_shared::{
    CapabilitiesRes, CredentialsReq, ErrorRes, FavoriteListRes, FavoriteRes, HealthRes,
    IngredientLineReq, IngredientRes, ProfileRes, RecipeDetailRes, RecipeListRes, RecipeReq,
    RecipeRes, SearchRes, SessionRes, ToggleFavoriteRes, UpdateProfileReq,
};
use axum::{
    routing::{get, post},
    Router,
};
use recipebox_core::{
    AuthService, CoreConfig, DocumentStore, FavoriteService, MealDbClient, MealTransport,
    MemoryAuth, MemoryStore, ProfileService, RecipeResult, RecipeService, SearchAggregator,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub search: SearchAggregator<Box<dyn MealTransport>>,
    pub recipes: RecipeService,
    pub favorites: FavoriteService,
    pub profiles: ProfileService,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthService>,
        meals: MealDbClient<Box<dyn MealTransport>>,
    ) -> Self {
        Self {
            auth,
            search: SearchAggregator::new(store.clone(), Arc::new(meals)),
            recipes: RecipeService::new(store.clone()),
            favorites: FavoriteService::new(store.clone()),
            profiles: ProfileService::new(store),
        }
    }

    /// In-process store and auth, HTTP meal API client configured from `cfg`.
    pub fn in_memory(cfg: &CoreConfig) -> RecipeResult<Self> {
        let meals = MealDbClient::from_config(cfg)?.boxed();
        Ok(Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryAuth::new()),
            meals,
        ))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::sign_up,
        handlers::sign_in,
        handlers::sign_out,
        handlers::search_recipes,
        handlers::get_recipe,
        handlers::create_recipe,
        handlers::update_recipe,
        handlers::delete_recipe,
        handlers::toggle_favorite,
        handlers::remove_favorite,
        handlers::my_recipes,
        handlers::my_favorites,
        handlers::get_profile,
        handlers::update_profile,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        CredentialsReq,
        SessionRes,
        IngredientRes,
        RecipeRes,
        SearchRes,
        CapabilitiesRes,
        RecipeDetailRes,
        IngredientLineReq,
        RecipeReq,
        RecipeListRes,
        FavoriteRes,
        FavoriteListRes,
        ToggleFavoriteRes,
        ProfileRes,
        UpdateProfileReq,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST router, Swagger UI included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/auth/signup", post(handlers::sign_up))
        .route("/auth/signin", post(handlers::sign_in))
        .route("/auth/signout", post(handlers::sign_out))
        .route("/recipes", post(handlers::create_recipe))
        .route("/recipes/search", get(handlers::search_recipes))
        .route(
            "/recipes/:id",
            get(handlers::get_recipe)
                .put(handlers::update_recipe)
                .delete(handlers::delete_recipe),
        )
        .route(
            "/recipes/:id/favorite",
            post(handlers::toggle_favorite).delete(handlers::remove_favorite),
        )
        .route("/me/recipes", get(handlers::my_recipes))
        .route("/me/favorites", get(handlers::my_favorites))
        .route(
            "/me/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use recipebox_core::meal_api::MealRequest;
    use recipebox_core::{RateLimiter, RecipeError, ResponseCache};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Canned meal API: known cache keys return a body, anything else is a 503.
    #[derive(Default)]
    struct CannedMeals(HashMap<String, String>);

    impl CannedMeals {
        fn with(mut self, request: MealRequest, body: Value) -> Self {
            self.0.insert(request.cache_key(), body.to_string());
            self
        }
    }

    #[async_trait]
    impl MealTransport for CannedMeals {
        async fn fetch(&self, request: &MealRequest) -> RecipeResult<String> {
            self.0
                .get(&request.cache_key())
                .cloned()
                .ok_or_else(|| RecipeError::NetworkFailure("HTTP 503".into()))
        }
    }

    fn arrabiata() -> Value {
        json!({
            "idMeal": "52771",
            "strMeal": "Spicy Arrabiata Penne",
            "strCategory": "Vegetarian",
            "strArea": "Italian",
            "strMealThumb": "https://img.test/penne.jpg",
            "strInstructions": "Bring water to a boil. Add penne.",
            "strIngredient1": "penne rigate",
            "strMeasure1": "1 pound",
            "strIngredient2": "",
            "strMeasure2": ""
        })
    }

    fn app(meals: CannedMeals) -> Router {
        let client = MealDbClient::new(
            meals,
            ResponseCache::new(Duration::from_secs(60), None),
            RateLimiter::new(Duration::ZERO),
        )
        .boxed();
        router(AppState::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryAuth::new()),
            client,
        ))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn sign_up(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/auth/signup",
            None,
            Some(json!({"email": email, "password": "hunter22"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    fn scones() -> Value {
        json!({
            "title": "Scones",
            "ingredients": [{"ingredient": "Flour", "measure": "200g"}],
            "instructions": "Rub in the butter. Bake."
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app(CannedMeals::default()), Method::GET, "/health", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn search_merges_local_then_remote() {
        let meals = CannedMeals::default().with(
            MealRequest::search("S"),
            json!({"meals": [arrabiata()]}),
        );
        let app = app(meals);
        let token = sign_up(&app, "cook@example.test").await;
        send(&app, Method::POST, "/recipes", Some(&token), Some(scones())).await;

        let (status, body) = send(&app, Method::GET, "/recipes/search?q=S", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body["recipes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Scones", "Spicy Arrabiata Penne"]);
        assert_eq!(body["recipes"][0]["origin"], "custom");
        assert_eq!(body["recipes"][1]["origin"], "external");
        assert_eq!(body["skipped"], 0);
    }

    #[tokio::test]
    async fn blank_search_is_empty_and_remote_failure_is_bad_gateway() {
        let app = app(CannedMeals::default());

        let (status, body) = send(&app, Method::GET, "/recipes/search?q=", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recipes"], json!([]));

        let (status, body) =
            send(&app, Method::GET, "/recipes/search?q=Pasta", None, None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("unreachable"));
    }

    #[tokio::test]
    async fn recipe_detail_reports_capabilities_per_caller() {
        let app = app(CannedMeals::default());
        let owner = sign_up(&app, "owner@example.test").await;
        let other = sign_up(&app, "other@example.test").await;
        let (_, created) =
            send(&app, Method::POST, "/recipes", Some(&owner), Some(scones())).await;
        let uri = format!("/recipes/{}", created["id"].as_str().unwrap());

        let (_, as_owner) = send(&app, Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(
            as_owner["capabilities"],
            json!({"canEdit": true, "canDelete": true, "canFavorite": true})
        );

        let (_, as_other) = send(&app, Method::GET, &uri, Some(&other), None).await;
        assert_eq!(
            as_other["capabilities"],
            json!({"canEdit": false, "canDelete": false, "canFavorite": true})
        );

        let (status, anonymous) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(anonymous["capabilities"]["canFavorite"], false);
        assert_eq!(anonymous["isFavorite"], false);
    }

    #[tokio::test]
    async fn writes_are_checked_on_the_server() {
        let app = app(CannedMeals::default());
        let owner = sign_up(&app, "owner@example.test").await;
        let other = sign_up(&app, "other@example.test").await;

        let (status, _) = send(&app, Method::POST, "/recipes", None, Some(scones())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, created) =
            send(&app, Method::POST, "/recipes", Some(&owner), Some(scones())).await;
        let uri = format!("/recipes/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, Method::PUT, &uri, Some(&other), Some(scones())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&other), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &uri, None, None).await;
        // gone locally, so the remote lookup runs and the canned API has no answer
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn favorite_toggle_round_trip() {
        let meals = CannedMeals::default().with(
            MealRequest::lookup("52771"),
            json!({"meals": [arrabiata()]}),
        );
        let app = app(meals);
        let token = sign_up(&app, "fan@example.test").await;

        let (status, body) =
            send(&app, Method::POST, "/recipes/52771/favorite", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isFavorite"], true);

        let (_, favorites) = send(&app, Method::GET, "/me/favorites", Some(&token), None).await;
        assert_eq!(favorites["favorites"][0]["recipeId"], "52771");
        assert_eq!(
            favorites["favorites"][0]["recipe"]["title"],
            "Spicy Arrabiata Penne"
        );

        let (_, body) =
            send(&app, Method::POST, "/recipes/52771/favorite", Some(&token), None).await;
        assert_eq!(body["isFavorite"], false);

        let (status, _) =
            send(&app, Method::POST, "/recipes/52771/favorite", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn favorite_of_a_deleted_recipe_can_still_be_removed() {
        let app = app(CannedMeals::default());
        let owner = sign_up(&app, "owner@example.test").await;
        let fan = sign_up(&app, "fan@example.test").await;
        let (_, created) =
            send(&app, Method::POST, "/recipes", Some(&owner), Some(scones())).await;
        let id = created["id"].as_str().unwrap().to_string();
        let favorite_uri = format!("/recipes/{id}/favorite");

        let (_, body) = send(&app, Method::POST, &favorite_uri, Some(&fan), None).await;
        assert_eq!(body["isFavorite"], true);

        let (status, _) =
            send(&app, Method::DELETE, &format!("/recipes/{id}"), Some(&owner), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // the toggle resolves the recipe first, which now fails
        let (status, _) = send(&app, Method::POST, &favorite_uri, Some(&fan), None).await;
        assert_ne!(status, StatusCode::OK);
        let (_, favorites) = send(&app, Method::GET, "/me/favorites", Some(&fan), None).await;
        assert_eq!(favorites["favorites"][0]["recipe"]["title"], "Scones");

        let (status, _) = send(&app, Method::DELETE, &favorite_uri, Some(&fan), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, favorites) = send(&app, Method::GET, "/me/favorites", Some(&fan), None).await;
        assert_eq!(favorites["favorites"], json!([]));

        let (status, _) = send(&app, Method::DELETE, &favorite_uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn profile_and_sign_out() {
        let app = app(CannedMeals::default());
        let token = sign_up(&app, "me@example.test").await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/me/profile",
            Some(&token),
            Some(json!({"name": "Ada", "email": "me@example.test"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Ada");

        let (status, _) = send(&app, Method::POST, "/auth/signout", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, "/me/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
