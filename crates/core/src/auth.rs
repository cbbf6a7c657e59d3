//! Authentication collaborator.
//!
//! The core only ever reads whether an [`Identity`] is present and its `uid`. Account
//! management sits behind the [`AuthService`] trait; [`MemoryAuth`] keeps accounts and
//! sessions in process with salted SHA-256 password hashes.

use crate::error::{RecipeError, RecipeResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

const MIN_PASSWORD_LEN: usize = 6;

/// The signed-in user, as reported by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: String,
    pub email_verified: bool,
    pub creation_time: DateTime<Utc>,
}

/// A signed-in session. `token` is opaque to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub identity: Identity,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &str) -> RecipeResult<Session>;

    async fn sign_in(&self, email: &str, password: &str) -> RecipeResult<Session>;

    /// Ends a session. Unknown tokens are ignored.
    async fn sign_out(&self, token: &str) -> RecipeResult<()>;

    /// Resolves a session token to its identity, or `None` for unknown tokens.
    async fn current(&self, token: &str) -> RecipeResult<Option<Identity>>;
}

#[derive(Debug)]
struct Account {
    identity: Identity,
    salt: String,
    password_hash: String,
}

#[derive(Debug, Default)]
struct AuthState {
    // keyed by lowercased email
    accounts: HashMap<String, Account>,
    // token -> lowercased email
    sessions: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct MemoryAuth {
    state: Mutex<AuthState>,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn normalise_email(email: &str) -> RecipeResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(RecipeError::InvalidInput("invalid email address".into())),
    }
}

fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn open_session(state: &mut AuthState, email: String, identity: Identity) -> Session {
        let token = new_token();
        state.sessions.insert(token.clone(), email);
        Session { token, identity }
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> RecipeResult<Session> {
        let email = normalise_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RecipeError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let mut state = self.lock();
        if state.accounts.contains_key(&email) {
            return Err(RecipeError::EmailInUse);
        }

        let salt = new_token();
        let identity = Identity {
            uid: uuid::Uuid::new_v4().simple().to_string(),
            email_verified: false,
            creation_time: Utc::now(),
        };
        state.accounts.insert(
            email.clone(),
            Account {
                identity: identity.clone(),
                password_hash: hash_password(&salt, password),
                salt,
            },
        );
        tracing::info!(uid = %identity.uid, "account created");

        Ok(Self::open_session(&mut state, email, identity))
    }

    async fn sign_in(&self, email: &str, password: &str) -> RecipeResult<Session> {
        let email = normalise_email(email).map_err(|_| RecipeError::InvalidCredentials)?;

        let mut state = self.lock();
        let identity = match state.accounts.get(&email) {
            Some(account) if hash_password(&account.salt, password) == account.password_hash => {
                account.identity.clone()
            }
            _ => return Err(RecipeError::InvalidCredentials),
        };

        Ok(Self::open_session(&mut state, email, identity))
    }

    async fn sign_out(&self, token: &str) -> RecipeResult<()> {
        self.lock().sessions.remove(token);
        Ok(())
    }

    async fn current(&self, token: &str) -> RecipeResult<Option<Identity>> {
        let state = self.lock();
        Ok(state
            .sessions
            .get(token)
            .and_then(|email| state.accounts.get(email))
            .map(|account| account.identity.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_then_current_resolves_identity() {
        let auth = MemoryAuth::new();
        let session = auth.sign_up("Cook@Example.com", "secret1").await.unwrap();

        let identity = auth.current(&session.token).await.unwrap();
        assert_eq!(identity, Some(session.identity));
    }

    #[tokio::test]
    async fn sign_in_is_case_insensitive_on_email() {
        let auth = MemoryAuth::new();
        let created = auth.sign_up("cook@example.com", "secret1").await.unwrap();

        let session = auth.sign_in("COOK@example.com", "secret1").await.unwrap();
        assert_eq!(session.identity.uid, created.identity.uid);
        assert_ne!(session.token, created.token);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = MemoryAuth::new();
        auth.sign_up("cook@example.com", "secret1").await.unwrap();

        let err = auth
            .sign_in("cook@example.com", "secret2")
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::InvalidCredentials));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = MemoryAuth::new();
        auth.sign_up("cook@example.com", "secret1").await.unwrap();

        let err = auth
            .sign_up(" cook@example.com ", "another1")
            .await
            .unwrap_err();
        assert!(matches!(err, RecipeError::EmailInUse));
    }

    #[tokio::test]
    async fn short_password_and_bad_email_are_invalid_input() {
        let auth = MemoryAuth::new();
        assert!(matches!(
            auth.sign_up("cook@example.com", "abc").await.unwrap_err(),
            RecipeError::InvalidInput(_)
        ));
        assert!(matches!(
            auth.sign_up("not-an-email", "secret1").await.unwrap_err(),
            RecipeError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn sign_out_ends_session() {
        let auth = MemoryAuth::new();
        let session = auth.sign_up("cook@example.com", "secret1").await.unwrap();

        auth.sign_out(&session.token).await.unwrap();
        assert_eq!(auth.current(&session.token).await.unwrap(), None);
    }
}
