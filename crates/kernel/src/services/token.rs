//! Bearer token service.
//!
//! Access tokens are HS256 JWTs whose subject is the username. Validation
//! is stateless: signature, issuer and expiry only.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// JWT issuer claim value.
const ISSUER: &str = "folio";

/// Default access token lifetime in seconds (1 hour).
pub const ACCESS_TOKEN_LIFETIME: i64 = 3600;

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer.
    pub iss: String,
    /// Subject (username).
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// JWT ID (unique per token).
    pub jti: String,
}

/// A freshly issued access token.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Signs and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl TokenService {
    /// Create a token service with HMAC-SHA256 signing.
    pub fn new(secret: &[u8], lifetime_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime_secs,
        }
    }

    /// Issue an access token bound to `username`.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            iss: ISSUER.to_string(),
            sub: username.to_string(),
            iat: now,
            exp: now + self.lifetime_secs,
            jti: Uuid::now_v7().to_string(),
        };

        let access_token =
            jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
                .map_err(AuthError::Issue)?;

        Ok(IssuedToken {
            access_token,
            token_type: "Bearer",
            expires_in: self.lifetime_secs,
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn issued_token_verifies() {
        let tokens = TokenService::new(SECRET, ACCESS_TOKEN_LIFETIME);
        let issued = tokens.issue("admin").unwrap();

        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let claims = tokens.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, "folio");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = TokenService::new(SECRET, -3600);
        let issued = tokens.issue("admin").unwrap();

        assert!(matches!(
            tokens.verify(&issued.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let ours = TokenService::new(SECRET, 3600);
        let theirs = TokenService::new(b"another-secret-another-secret-xx", 3600);
        let issued = theirs.issue("admin").unwrap();

        assert!(matches!(
            ours.verify(&issued.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = TokenService::new(SECRET, 3600);
        assert!(tokens.verify("not-a-jwt").is_err());
        assert!(tokens.verify("").is_err());
    }
}
