//! Auth service: register, login, and access-token verification.

use std::sync::Arc;
use std::time::Duration;

use axis_types::error::{
    Action, ActionType, CredentialError, HttpError, RepositoryError, ServiceError,
};
use axis_types::user::{AccessToken, LoginRequest, NewUser, RegisterRequest, normalize_email};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::credentials::{CredentialHasher, TokenIssuer};
use crate::auth::repository::UserStore;

const INVALID_CREDENTIALS: &str = "invalid email or password";
const INVALID_TOKEN: &str = "invalid or expired access token";
const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Issues access tokens for registered accounts and verifies them on gated routes.
pub struct AuthService<U, H, T>
where
    U: UserStore,
    H: CredentialHasher + 'static,
    T: TokenIssuer,
{
    users: U,
    hasher: Arc<H>,
    tokens: T,
    storage_timeout: Duration,
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserStore,
    H: CredentialHasher + 'static,
    T: TokenIssuer,
{
    pub fn new(users: U, hasher: H, tokens: T, storage_timeout: Duration) -> Self {
        Self {
            users,
            hasher: Arc::new(hasher),
            tokens,
            storage_timeout,
        }
    }

    /// Create an account and sign the caller in.
    ///
    /// A duplicate email surfaces as a storage conflict on `email`.
    pub async fn register(&self, request: RegisterRequest) -> Result<AccessToken, ServiceError> {
        let email = normalize_email(&request.email);
        let password = request.password;
        let password_hash = self
            .run_hasher(move |hasher| hasher.hash_password(&password))
            .await?;

        let user = tokio::time::timeout(
            self.storage_timeout,
            self.users.create_user(NewUser {
                email,
                password_hash,
            }),
        )
        .await
        .map_err(|_| RepositoryError::Timeout)??;

        info!(user_id = %user.id, "user registered");
        Ok(self.issue(user.id)?)
    }

    /// Exchange email and password for an access token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AccessToken, ServiceError> {
        let email = normalize_email(&request.email);
        let user = tokio::time::timeout(self.storage_timeout, self.users.find_by_email(&email))
            .await
            .map_err(|_| RepositoryError::Timeout)??;

        let Some(user) = user else {
            debug!("login for unknown email");
            return Err(HttpError::unauthorized(INVALID_CREDENTIALS).into());
        };

        let password = request.password;
        let stored = user.password_hash.clone();
        let matches = self
            .run_hasher(move |hasher| hasher.verify_password(&password, &stored))
            .await?;
        if !matches {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(HttpError::unauthorized(INVALID_CREDENTIALS).into());
        }

        info!(user_id = %user.id, "user logged in");
        Ok(self.issue(user.id)?)
    }

    /// Resolve an access token to the user it was issued for.
    pub fn verify_token(&self, token: &str) -> Result<Uuid, HttpError> {
        let claims = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "access token rejected");
            token_rejected()
        })?;
        Uuid::parse_str(&claims.sub).map_err(|_| {
            debug!(sub = %claims.sub, "access token subject is not a user id");
            token_rejected()
        })
    }

    fn issue(&self, user_id: Uuid) -> Result<AccessToken, HttpError> {
        self.tokens.issue(user_id).map_err(|err| {
            error!(%user_id, error = %err, "failed to sign access token");
            HttpError::internal()
        })
    }

    async fn run_hasher<R, F>(&self, op: F) -> Result<R, HttpError>
    where
        F: FnOnce(&H) -> Result<R, CredentialError> + Send + 'static,
        R: Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        match tokio::task::spawn_blocking(move || op(hasher.as_ref())).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                error!(error = %err, "credential operation failed");
                Err(HttpError::internal())
            }
            Err(err) => {
                error!(error = %err, "credential task did not complete");
                Err(HttpError::internal())
            }
        }
    }
}

fn token_rejected() -> HttpError {
    HttpError::forbidden(INVALID_TOKEN).with_action(Action {
        action_type: ActionType::Reauthenticate,
        message: "sign in again".to_string(),
        value: LOGIN_PATH.to_string(),
    })
}
