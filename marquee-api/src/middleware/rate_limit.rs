use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

pub async fn signup_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let max_requests = state.rate_limits.signup_max_requests;
    enforce(&state, "signup", max_requests, req, next).await
}

pub async fn login_rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let max_requests = state.rate_limits.login_max_requests;
    enforce(&state, "login", max_requests, req, next).await
}

async fn enforce(
    state: &AppState,
    scope: &str,
    max_requests: u32,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let key = format!("ratelimit:{}:{}", scope, client);

    if !state
        .rate_limiter
        .check_rate_limit(&key, max_requests, state.rate_limits.window)
    {
        tracing::warn!(scope, client = %client, "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(req).await)
}
