use std::any::Any;

use axum::{
    http::{header, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod error;
pub mod middleware;
pub mod movies;
pub mod params;
pub mod password;
pub mod state;
pub mod summary_handler;
pub mod worker;

pub use error::AppError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let allow_origin = match &state.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Signup and login are throttled independently
    let signup = auth::signup_routes()
        .route_layer(from_fn_with_state(state.clone(), middleware::signup_rate_limit));
    let login = auth::login_routes()
        .route_layer(from_fn_with_state(state.clone(), middleware::login_rate_limit));

    Router::new()
        .route("/health", get(health))
        .merge(signup)
        .merge(login)
        .merge(movies::routes())
        .merge(bookings::routes())
        .merge(summary_handler::routes())
        .fallback(endpoint_not_found)
        .method_not_allowed_fallback(endpoint_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn endpoint_not_found() -> AppError {
    AppError::NotFoundError("Endpoint not found".to_string())
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::InternalServerError(format!("Handler panicked: {}", detail)).into_response()
}
