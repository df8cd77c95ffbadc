use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use marquee_core::UserId;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::{AppState, AuthConfig};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    pub user_id: UserId,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

pub fn verify_token(auth: &AuthConfig, token: &str) -> Result<UserClaims, jsonwebtoken::errors::Error> {
    decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

// ============================================================================
// Bearer Extractor
// ============================================================================

/// Caller identity taken from `Authorization: Bearer <token>`.
///
/// A missing header or an empty token (`Bearer` alone) is rejected with 401; a malformed,
/// forged or expired token with 403.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: UserId,
    pub username: String,
}

/// Whether the header has a non-empty second space-separated part.
fn carries_token(parts: &Parts) -> bool {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return false;
    };
    match value.to_str() {
        Ok(value) => matches!(value.split(' ').nth(1), Some(token) if !token.is_empty()),
        // Opaque bytes are still a credential attempt
        Err(_) => true,
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() || !carries_token(parts) {
                    AppError::AuthenticationError("Access token required".to_string())
                } else {
                    AppError::AuthorizationError("Invalid or expired token".to_string())
                }
            })?;

        let claims = verify_token(&state.auth, bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::AuthorizationError("Invalid or expired token".to_string())
        })?;

        Ok(AuthUser {
            user_id: claims.user_id,
            username: claims.username,
        })
    }
}
