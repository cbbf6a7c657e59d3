use crate::error::ApiError;
use crate::AppState;
use api_shared::auth::bearer_token;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use recipebox_core::Identity;

/// The caller's identity, if the request carries a live session token.
///
/// A missing or unknown token yields an anonymous caller rather than a rejection; handlers
/// decide whether anonymity is acceptable.
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

/// The raw session token from the `Authorization` header.
pub struct SessionToken(pub Option<String>);

fn token_from(parts: &Parts) -> Option<&str> {
    bearer_token(parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = token_from(parts) else {
            return Ok(Self(None));
        };
        Ok(Self(state.auth.current(token).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(token_from(parts).map(str::to_owned)))
    }
}
