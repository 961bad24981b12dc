//! Login and request authorization.

use std::sync::{Arc, LazyLock};

use tracing::{debug, info};

use super::AuthError;
use super::token::{IssuedToken, TokenService};
use crate::models::User;
use crate::models::user::hash_password_argon2;
use crate::store::UserStore;

/// Record checked when the username is unknown, so a miss costs a full
/// Argon2 verification just like a hit does.
static DUMMY_USER: LazyLock<Option<User>> = LazyLock::new(|| {
    hash_password_argon2("folio-unknown-user")
        .ok()
        .map(|hash| User::new("", hash))
});

/// Identity extracted from a valid bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

/// Credential verification and token issuance.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    /// Create an auth service.
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Verify credentials and issue an access token.
    ///
    /// An unknown user and a wrong password produce the same
    /// `InvalidCredentials` error.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = self
            .users
            .find_by_username(username)
            .await
            .map_err(AuthError::Store)?;

        let verified = match user {
            Some(user) => user.verify_password(password).then_some(user),
            None => {
                if let Some(dummy) = DUMMY_USER.as_ref() {
                    let _ = dummy.verify_password(password);
                }
                None
            }
        };

        let Some(user) = verified else {
            debug!(username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let token = self.tokens.issue(&user.username)?;
        info!(username = %user.username, "user logged in");
        Ok(token)
    }

    /// Validate a bearer token and return the identity it carries.
    pub fn authorize(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.tokens.verify(token)?;
        Ok(Identity {
            username: claims.sub,
        })
    }
}
