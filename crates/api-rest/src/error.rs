use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipebox_core::RecipeError;

/// A core error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub RecipeError);

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RecipeError::Unauthenticated | RecipeError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            RecipeError::PermissionDenied => StatusCode::FORBIDDEN,
            RecipeError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecipeError::MalformedRecord { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RecipeError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
            RecipeError::InvalidInput(_) | RecipeError::EmailInUse => StatusCode::BAD_REQUEST,
            RecipeError::Serialization(_) | RecipeError::Deserialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!("request failed: {}", self.0);
            "Internal error".to_string()
        } else {
            tracing::debug!(%status, "request rejected: {}", self.0);
            self.0.to_string()
        };

        (status, Json(ErrorRes { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
