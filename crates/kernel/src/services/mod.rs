//! Authentication services.

pub mod auth;
pub mod token;

use thiserror::Error;

use crate::store::StoreError;

pub use auth::{AuthService, Identity};
pub use token::{IssuedToken, TokenService};

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password; deliberately indistinguishable.
    #[error("bad username or password")]
    InvalidCredentials,

    /// Missing, malformed, tampered or expired bearer token.
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("failed to issue token")]
    Issue(#[source] jsonwebtoken::errors::Error),

    #[error("credential lookup failed")]
    Store(#[source] StoreError),
}
