use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use marquee_booking::{Booking, BookingError, BookingStatus, Resource};
use marquee_core::BookingId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::middleware::AuthUser;
use crate::params::{body_or_default, entity_id, integral, path_id};
use crate::state::AppState;

// Fields arrive as raw JSON values so that missing, zero and non-integer inputs can be
// told apart.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    movie_id: Value,
    #[serde(default)]
    show_id: Value,
    #[serde(default)]
    seats: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    #[serde(default)]
    seats: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmedBooking {
    booking_id: BookingId,
    movie_title: String,
    show_time: String,
    seats: u32,
    total_amount: u64,
    status: BookingStatus,
}

#[derive(Debug, Serialize)]
struct CreateBookingResponse {
    message: &'static str,
    booking: ConfirmedBooking,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResizedBooking {
    booking_id: BookingId,
    seats: u32,
    total_amount: u64,
}

#[derive(Debug, Serialize)]
struct UpdateBookingResponse {
    message: &'static str,
    booking: ResizedBooking,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelBookingResponse {
    message: &'static str,
    refund_amount: u64,
}

#[derive(Debug, Serialize)]
struct BookingListResponse {
    bookings: Vec<Booking>,
    count: usize,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{booking_id}",
            get(get_booking).put(update_booking).delete(cancel_booking),
        )
}

/// Absent, null, zero, false and empty-string values all count as not supplied.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// `None` when the id is numeric but cannot name a booking.
fn parse_booking_id(raw: &str) -> Result<Option<BookingId>, AppError> {
    path_id(raw, "Invalid booking ID")
}

fn booking_not_found() -> AppError {
    BookingError::NotFound(Resource::Booking).into()
}

async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), AppError> {
    let req = body_or_default(payload)?;

    if is_blank(&req.movie_id) || is_blank(&req.show_id) || is_blank(&req.seats) {
        return Err(AppError::validation("movieId, showId and seats are required"));
    }

    let seats = integral(&req.seats)
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::validation("Seats must be a positive integer"))?;

    // Ids that are not non-negative integers cannot match any catalog entry.
    let movie_id = entity_id(&req.movie_id).unwrap_or(0);
    let show_id = entity_id(&req.show_id).unwrap_or(0);

    let booking = state
        .bookings
        .create_booking(user.user_id, movie_id, show_id, seats)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            message: "Booking successful",
            booking: ConfirmedBooking {
                booking_id: booking.booking_id,
                movie_title: booking.movie_title,
                show_time: booking.show_time,
                seats: booking.seats,
                total_amount: booking.total_amount,
                status: booking.status,
            },
        }),
    ))
}

async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = state.bookings.list_bookings(user.user_id).await?;
    Ok(Json(BookingListResponse {
        count: bookings.len(),
        bookings,
    }))
}

async fn get_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking_id = parse_booking_id(&booking_id)?.ok_or_else(booking_not_found)?;
    let booking = state.bookings.get_booking(user.user_id, booking_id).await?;
    Ok(Json(booking))
}

async fn update_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<String>,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> Result<Json<UpdateBookingResponse>, AppError> {
    let booking_id = parse_booking_id(&booking_id)?;
    let req = body_or_default(payload)?;

    let seats = integral(&req.seats)
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::validation("Invalid seats value"))?;
    let booking_id = booking_id.ok_or_else(booking_not_found)?;

    let booking = state
        .bookings
        .update_booking(user.user_id, booking_id, seats)
        .await?;

    Ok(Json(UpdateBookingResponse {
        message: "Booking updated successfully",
        booking: ResizedBooking {
            booking_id: booking.booking_id,
            seats: booking.seats,
            total_amount: booking.total_amount,
        },
    }))
}

async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<CancelBookingResponse>, AppError> {
    let booking_id = parse_booking_id(&booking_id)?.ok_or_else(booking_not_found)?;
    let refund = state.bookings.cancel_booking(user.user_id, booking_id).await?;

    Ok(Json(CancelBookingResponse {
        message: "Booking cancelled successfully",
        refund_amount: refund.refund_amount,
    }))
}
