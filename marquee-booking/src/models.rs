use chrono::{DateTime, Utc};
use marquee_catalog::{Movie, SeatHold, Show};
use marquee_core::{BookingId, MovieId, ShowId, UserId};
use marquee_shared::Masked;
use serde::{Deserialize, Serialize};

/// Booking status. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A user's reservation of seats on one show.
///
/// `movie_title` and `show_time` are display snapshots taken at booking time; amounts are
/// always computed from the live show price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: BookingId,
    pub movie_id: MovieId,
    pub movie_title: String,
    pub show_id: ShowId,
    pub show_time: String,
    pub seats: u32,
    pub total_amount: u64,
    pub status: BookingStatus,
    pub booking_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn confirmed(booking_id: BookingId, movie: &Movie, show: &Show, seats: u32) -> Self {
        Self {
            booking_id,
            movie_id: movie.id,
            movie_title: movie.title.clone(),
            show_id: show.show_id,
            show_time: show.time.clone(),
            seats,
            total_amount: show.price_for(seats),
            status: BookingStatus::Confirmed,
            booking_date: Utc::now(),
            cancelled_at: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

impl SeatHold for Booking {
    fn show_id(&self) -> ShowId {
        self.show_id
    }

    fn seats(&self) -> u32 {
        self.seats
    }

    fn is_released(&self) -> bool {
        self.is_cancelled()
    }

    fn apply_resize(&mut self, seats: u32, total_amount: u64) {
        self.seats = seats;
        self.total_amount = total_amount;
    }

    fn mark_released(&mut self, released_at: DateTime<Utc>) {
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(released_at);
    }
}

/// A registered account and the bookings it owns, in the order they were made.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    /// Lowercase-normalized.
    pub email: String,
    pub password_hash: Masked<String>,
    pub bookings: Vec<Booking>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn booking(&self, booking_id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.booking_id == booking_id)
    }

    pub fn booking_mut(&mut self, booking_id: BookingId) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.booking_id == booking_id)
    }
}

/// Input for account creation; `email` must already be normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Masked<String>,
}

/// Aggregate over a user's bookings. Amounts and seats only count confirmed bookings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub user_id: UserId,
    pub username: String,
    pub total_bookings: usize,
    pub total_amount_spent: u64,
    pub confirmed_bookings: usize,
    pub cancelled_bookings: usize,
    pub total_seats_booked: u64,
}

impl BookingSummary {
    pub fn for_user(user: &User) -> Self {
        let confirmed = user.bookings.iter().filter(|b| b.status == BookingStatus::Confirmed);

        Self {
            user_id: user.user_id,
            username: user.username.clone(),
            total_bookings: user.bookings.len(),
            total_amount_spent: confirmed.clone().map(|b| b.total_amount).sum(),
            confirmed_bookings: confirmed.clone().count(),
            cancelled_bookings: user.bookings.iter().filter(|b| b.is_cancelled()).count(),
            total_seats_booked: confirmed.map(|b| u64::from(b.seats)).sum(),
        }
    }
}

/// Outcome of a cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
    pub booking: Booking,
    pub refund_amount: u64,
}
