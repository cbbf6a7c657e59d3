#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("recipe service unreachable: {0}")]
    NetworkFailure(String),
    #[error("malformed recipe record{}: {reason}", id_suffix(.id))]
    MalformedRecord { id: Option<String>, reason: String },
    #[error("{what} not found")]
    NotFound { what: String },

    #[error("you must be signed in to do that")]
    Unauthenticated,
    #[error("you do not have permission to modify this recipe")]
    PermissionDenied,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account already exists for that email")]
    EmailInUse,

    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
}

fn id_suffix(id: &Option<String>) -> String {
    id.as_deref().map(|i| format!(" {i}")).unwrap_or_default()
}

impl RecipeError {
    pub(crate) fn malformed(id: Option<&str>, reason: impl Into<String>) -> Self {
        RecipeError::MalformedRecord {
            id: id.map(str::to_owned),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        RecipeError::NotFound { what: what.into() }
    }
}

impl From<recipe_types::TextError> for RecipeError {
    fn from(err: recipe_types::TextError) -> Self {
        RecipeError::InvalidInput(err.to_string())
    }
}

impl From<reqwest::Error> for RecipeError {
    fn from(err: reqwest::Error) -> Self {
        RecipeError::NetworkFailure(err.to_string())
    }
}

pub type RecipeResult<T> = std::result::Result<T, RecipeError>;
