//! Token issuance and password hashing for the user-facing auth flow.
//!
//! Sessions are stateless HS256 JWTs carrying the user id and email;
//! passwords are stored as bcrypt hashes (cost 12).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// JWT claims for a logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
}

/// Signing/verification state shared by the login handlers and the auth
/// middleware.
#[derive(Clone)]
pub struct AuthState {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
}

impl AuthState {
    #[must_use]
    pub fn new(secret: &str, token_ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::days(token_ttl_days),
        }
    }

    /// Signs a token for the given user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Token`] if signing fails.
    pub fn issue_token(&self, user_id: i64, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_owned(),
            exp: (now + self.token_ttl).timestamp(),
            iat: now.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verifies a token's signature and expiry, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Token`] for a bad signature, malformed token, or
    /// expired claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding,
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

/// Hashes a password with bcrypt at the default cost (12).
///
/// # Errors
///
/// Returns [`AuthError::Hash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
    Ok(hash)
}

/// Checks a password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch rather than an error, so a
/// corrupt row can never authenticate.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match bcrypt::verify(password, password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash failed to verify");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_and_carry_claims() {
        let auth = AuthState::new("test-secret", 7);
        let token = auth.issue_token(42, "ada@example.com").expect("sign");
        let claims = auth.verify_token(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let ours = AuthState::new("test-secret", 7);
        let theirs = AuthState::new("other-secret", 7);
        let token = theirs.issue_token(42, "ada@example.com").expect("sign");
        assert!(ours.verify_token(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // Negative TTL puts exp in the past.
        let auth = AuthState::new("test-secret", -1);
        let token = auth.issue_token(42, "ada@example.com").expect("sign");
        assert!(auth.verify_token(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let auth = AuthState::new("test-secret", 7);
        assert!(auth.verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("hunter22").expect("hash");
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn malformed_stored_hash_never_authenticates() {
        assert!(!verify_password("hunter22", "not-a-bcrypt-hash"));
    }
}
