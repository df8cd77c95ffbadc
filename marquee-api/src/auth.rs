use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use marquee_booking::User;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::params::body_or_default;
use crate::middleware::auth::UserClaims;
use crate::state::{AppState, AuthConfig};

#[derive(Debug, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    message: &'static str,
    user_id: u64,
    username: String,
    token: String,
}

pub fn signup_routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Sign a token carrying the user's id and name.
pub fn issue_token(auth: &AuthConfig, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = UserClaims {
        user_id: user.user_id,
        username: user.username.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(auth.expiration as i64)).timestamp(),
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.secret.as_bytes()))
        .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let req = body_or_default(payload)?;
    let user = state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;
    let token = issue_token(&state.auth, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully",
            user_id: user.user_id,
            username: user.username,
            token,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let req = body_or_default(payload)?;
    let user = state.accounts.login(&req.email, &req.password).await?;
    let token = issue_token(&state.auth, &user)?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user_id: user.user_id,
        username: user.username,
        token,
    }))
}
