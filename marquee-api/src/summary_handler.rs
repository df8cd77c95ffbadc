use axum::{extract::State, routing::get, Json, Router};
use marquee_booking::BookingSummary;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

async fn get_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BookingSummary>, AppError> {
    let summary = state.bookings.summary(user.user_id).await?;
    Ok(Json(summary))
}
