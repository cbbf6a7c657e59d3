use crate::error::ApiResult;
use crate::extract::{CurrentUser, SessionToken};
use crate::AppState;
use api_shared::{
    CapabilitiesRes, CredentialsReq, ErrorRes, FavoriteListRes, HealthRes, HealthService,
    ProfileRes, RecipeDetailRes, RecipeListRes, RecipeReq, RecipeRes, SearchRes, SessionRes,
    ToggleFavoriteRes, UpdateProfileReq,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use recipebox_core::{guard, RecipeError};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Title prefix, case-sensitive. Blank returns no results.
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = CredentialsReq,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionRes),
        (status = 400, description = "Invalid email, short password or email in use", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> ApiResult<(StatusCode, Json<SessionRes>)> {
    let session = state.auth.sign_up(&req.email, &req.password).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/auth/signin",
    request_body = CredentialsReq,
    responses(
        (status = 200, description = "Signed in", body = SessionRes),
        (status = 401, description = "Invalid email or password", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<CredentialsReq>,
) -> ApiResult<Json<SessionRes>> {
    let session = state.auth.sign_in(&req.email, &req.password).await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    post,
    path = "/auth/signout",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "No session token", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn sign_out(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> ApiResult<StatusCode> {
    let token = token.ok_or(RecipeError::Unauthenticated)?;
    state.auth.sign_out(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/recipes/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Local matches first, then remote matches", body = SearchRes),
        (status = 400, description = "Query too long", body = ErrorRes),
        (status = 502, description = "Meal API unreachable", body = ErrorRes)
    )
)]
/// Searches user recipes and the remote meal API by title prefix.
///
/// If either source fails the whole search fails; malformed records are skipped and
/// counted in `skipped`.
#[axum::debug_handler]
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchRes>> {
    let outcome = state.search.search(&params.q).await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    get,
    path = "/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe with the caller's capabilities", body = RecipeDetailRes),
        (status = 404, description = "No such recipe", body = ErrorRes),
        (status = 422, description = "Recipe record is malformed", body = ErrorRes),
        (status = 502, description = "Meal API unreachable", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<RecipeDetailRes>> {
    let recipe = state.search.find_by_id(&id).await?;
    let capabilities = guard::capabilities(user.identity(), &recipe);
    let is_favorite = state
        .favorites
        .is_favorite(user.identity(), &recipe.id)
        .await?;

    Ok(Json(RecipeDetailRes {
        recipe: recipe.into(),
        capabilities: CapabilitiesRes::from(capabilities),
        is_favorite,
    }))
}

#[utoipa::path(
    post,
    path = "/recipes",
    request_body = RecipeReq,
    responses(
        (status = 201, description = "Recipe created", body = RecipeRes),
        (status = 400, description = "Missing title or ingredients", body = ErrorRes),
        (status = 401, description = "Not signed in", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<RecipeReq>,
) -> ApiResult<(StatusCode, Json<RecipeRes>)> {
    let recipe = state.recipes.create(user.identity(), req.into()).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

#[utoipa::path(
    put,
    path = "/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeReq,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeRes),
        (status = 401, description = "Not signed in", body = ErrorRes),
        (status = 403, description = "Not the recipe's author", body = ErrorRes),
        (status = 404, description = "No such recipe", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn update_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<RecipeReq>,
) -> ApiResult<Json<RecipeRes>> {
    let recipe = state
        .recipes
        .update(user.identity(), &id, req.into())
        .await?;
    Ok(Json(recipe.into()))
}

#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Not signed in", body = ErrorRes),
        (status = 403, description = "Not the recipe's author", body = ErrorRes),
        (status = 404, description = "No such recipe", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.recipes.delete(user.identity(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Favorite state after the toggle", body = ToggleFavoriteRes),
        (status = 401, description = "Not signed in", body = ErrorRes),
        (status = 404, description = "No such recipe", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ToggleFavoriteRes>> {
    guard::require_identity(user.identity())?;
    let recipe = state.search.find_by_id(&id).await?;
    let is_favorite = state.favorites.toggle(user.identity(), &recipe).await?;
    Ok(Json(ToggleFavoriteRes { is_favorite }))
}

/// Removes the caller's favorite by recipe id without resolving the recipe, so favorites
/// of deleted recipes can still be cleared.
#[utoipa::path(
    delete,
    path = "/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Favorite removed, or there was none"),
        (status = 401, description = "Not signed in", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.favorites.remove(user.identity(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/me/recipes",
    responses(
        (status = 200, description = "Recipes authored by the caller", body = RecipeListRes),
        (status = 401, description = "Not signed in", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn my_recipes(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<RecipeListRes>> {
    let recipes = state.recipes.list_mine(user.identity()).await?;
    Ok(Json(RecipeListRes {
        recipes: recipes.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/me/favorites",
    responses(
        (status = 200, description = "The caller's favorites with their snapshots", body = FavoriteListRes),
        (status = 401, description = "Not signed in", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn my_favorites(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<FavoriteListRes>> {
    let favorites = state.favorites.list(user.identity()).await?;
    Ok(Json(FavoriteListRes {
        favorites: favorites.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/me/profile",
    responses(
        (status = 200, description = "The caller's profile", body = ProfileRes),
        (status = 401, description = "Not signed in", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<ProfileRes>> {
    let profile = state.profiles.get(user.identity()).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/me/profile",
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Profile saved", body = ProfileRes),
        (status = 400, description = "Invalid name or email", body = ErrorRes),
        (status = 401, description = "Not signed in", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateProfileReq>,
) -> ApiResult<Json<ProfileRes>> {
    let profile = state
        .profiles
        .update(user.identity(), &req.name, &req.email)
        .await?;
    Ok(Json(profile.into()))
}
