/**
 * Authentication Extractor
 *
 * Protected chat routes take an `AuthUser` argument. The extractor reads
 * the `Authorization: Bearer <token>` header, verifies the token with the
 * application's `TokenAuthority`, and yields the username it was issued to.
 * Missing or invalid credentials reject the request with 401 before the
 * handler runs.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::AuthError;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Axum extractor for authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

/// Extract the bearer token from request headers
///
/// # Returns
/// `None` if the header is missing or not of the form `Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            tracing::warn!("[Auth] Missing or malformed Authorization header");
            AuthError::MissingToken
        })?;

        let username = state.auth.username(token).map_err(|e| {
            tracing::warn!("[Auth] Invalid token: {}", e);
            e
        })?;

        Ok(AuthUser(AuthenticatedUser { username }))
    }
}
