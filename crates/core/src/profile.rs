//! User profile documents, keyed by uid in the `users` collection.

use crate::auth::Identity;
use crate::constants::USERS_COLLECTION;
use crate::error::{RecipeError, RecipeResult};
use crate::guard::require_identity;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_NAME_LEN: usize = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The user's profile; an empty one if they never saved it.
    pub async fn get(&self, identity: Option<&Identity>) -> RecipeResult<UserProfile> {
        let identity = require_identity(identity)?;
        match self.store.get(USERS_COLLECTION, &identity.uid).await? {
            Some(doc) => serde_json::from_value(doc).map_err(RecipeError::Deserialization),
            None => Ok(UserProfile::default()),
        }
    }

    pub async fn update(
        &self,
        identity: Option<&Identity>,
        name: &str,
        email: &str,
    ) -> RecipeResult<UserProfile> {
        let identity = require_identity(identity)?;

        let name = name.trim();
        if name.chars().count() > MAX_NAME_LEN {
            return Err(RecipeError::InvalidInput(format!(
                "name exceeds {MAX_NAME_LEN} characters"
            )));
        }
        let email = email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(RecipeError::InvalidInput("invalid email address".into()));
        }

        let profile = UserProfile {
            name: name.to_string(),
            email: email.to_string(),
            updated_at: Some(Utc::now()),
        };
        let doc = serde_json::to_value(&profile).map_err(RecipeError::Serialization)?;

        if self.store.get(USERS_COLLECTION, &identity.uid).await?.is_some() {
            self.store.update(USERS_COLLECTION, &identity.uid, doc).await?;
        } else {
            self.store.set(USERS_COLLECTION, &identity.uid, doc).await?;
        }
        tracing::info!(uid = %identity.uid, "profile updated");

        Ok(profile)
    }
}
