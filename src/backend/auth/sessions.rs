/**
 * Session Tokens
 *
 * This module handles JWT token generation and validation. A token's
 * subject is the user's display name; that name is what chat messages are
 * attributed to.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::error::BackendError;

/// Token lifetime in seconds (30 minutes)
pub const TOKEN_TTL_SECS: u64 = 30 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Token verification and creation failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials were presented
    #[error("missing credentials")]
    MissingToken,

    /// The token is malformed, expired or signed with another key
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token names no user
    #[error("token has an empty subject")]
    EmptySubject,
}

impl From<AuthError> for BackendError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => BackendError::unauthorized("Not authenticated"),
            _ => BackendError::unauthorized("Could not validate credentials"),
        }
    }
}

/// Issues and verifies session tokens with one shared secret
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority").finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Create an authority from an HMAC secret
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Create a token for a user
    ///
    /// Login is owned by the account service, so the server never calls
    /// this. It mints tokens for test fixtures and local development.
    ///
    /// # Arguments
    /// * `username` - Display name the token is issued to
    ///
    /// # Returns
    /// JWT token string
    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub: username.to_string(),
            exp: now + TOKEN_TTL_SECS,
            iat: now,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Verify and decode a JWT token
    ///
    /// # Returns
    /// Decoded claims or error
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        if token_data.claims.sub.trim().is_empty() {
            return Err(AuthError::EmptySubject);
        }
        Ok(token_data.claims)
    }

    /// Verify a token and return the username it was issued to
    pub fn username(&self, token: &str) -> Result<String, AuthError> {
        self.verify(token).map(|claims| claims.sub)
    }
}
