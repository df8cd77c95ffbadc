use std::sync::Arc;

use marquee_catalog::{validate_quantity, CatalogRepository, InventoryLedger, Show};
use marquee_core::{BookingId, IdSequence, MovieId, ShowId, UserId};

use crate::error::{BookingError, Resource};
use crate::models::{Booking, BookingSummary, Refund, User};
use crate::repository::UserRepository;

/// Booking lifecycle: `confirmed` on create, resized while confirmed, `cancelled` is terminal.
///
/// Seat accounting is delegated to the [`InventoryLedger`]; every ledger call happens inside
/// [`UserRepository::update_user`] so the booking record and the show's pool change together.
pub struct BookingService {
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn CatalogRepository>,
    ledger: Arc<InventoryLedger>,
    booking_ids: IdSequence,
}

impl BookingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        catalog: Arc<dyn CatalogRepository>,
        ledger: Arc<InventoryLedger>,
    ) -> Self {
        Self {
            users,
            catalog,
            ledger,
            booking_ids: IdSequence::for_bookings(),
        }
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub async fn create_booking(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        show_id: ShowId,
        seats: i64,
    ) -> Result<Booking, BookingError> {
        let seats = validate_quantity(seats)?;

        if !self.users.contains_user(user_id).await? {
            return Err(BookingError::NotFound(Resource::User));
        }

        let movie = self
            .catalog
            .find_movie(movie_id)
            .await?
            .ok_or(BookingError::NotFound(Resource::Movie))?;
        let show = movie
            .show(show_id)
            .cloned()
            .ok_or(BookingError::NotFound(Resource::Show))?;

        let ledger = &self.ledger;
        let booking_ids = &self.booking_ids;
        let booking = self
            .users
            .update_user(
                user_id,
                Box::new(move |user: &mut User| -> Result<Booking, BookingError> {
                    ledger.reserve(&show, seats)?;
                    let booking = Booking::confirmed(booking_ids.next_id(), &movie, &show, seats);
                    user.bookings.push(booking.clone());
                    Ok(booking)
                }),
            )
            .await?;

        tracing::info!(
            user_id,
            booking_id = booking.booking_id,
            show_id,
            seats,
            total_amount = booking.total_amount,
            "Booking confirmed"
        );
        Ok(booking)
    }

    pub async fn list_bookings(&self, user_id: UserId) -> Result<Vec<Booking>, BookingError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BookingError::NotFound(Resource::User))?;
        Ok(user.bookings)
    }

    /// One booking, visible only to its owner.
    pub async fn get_booking(&self, user_id: UserId, booking_id: BookingId) -> Result<Booking, BookingError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BookingError::NotFound(Resource::User))?;
        user.booking(booking_id)
            .cloned()
            .ok_or(BookingError::NotFound(Resource::Booking))
    }

    /// Change a confirmed booking's seat count. Only the difference moves through the
    /// show's pool, and the total is recomputed at the show's current price.
    pub async fn update_booking(
        &self,
        user_id: UserId,
        booking_id: BookingId,
        seats: i64,
    ) -> Result<Booking, BookingError> {
        let seats = validate_quantity(seats)?;

        let current = self.get_booking(user_id, booking_id).await?;
        if current.is_cancelled() {
            return Err(BookingError::invalid_state("Cannot update cancelled booking"));
        }
        let show = self.resolve_show(current.movie_id, current.show_id).await?;

        let ledger = &self.ledger;
        let booking = self
            .users
            .update_user(
                user_id,
                Box::new(move |user: &mut User| -> Result<Booking, BookingError> {
                    let booking = user
                        .booking_mut(booking_id)
                        .ok_or(BookingError::NotFound(Resource::Booking))?;
                    if booking.is_cancelled() {
                        return Err(BookingError::invalid_state("Cannot update cancelled booking"));
                    }
                    ledger.resize(&show, &mut *booking, seats)?;
                    Ok(booking.clone())
                }),
            )
            .await?;

        tracing::info!(
            user_id,
            booking_id,
            from_seats = current.seats,
            to_seats = booking.seats,
            total_amount = booking.total_amount,
            "Booking resized"
        );
        Ok(booking)
    }

    /// Cancel a confirmed booking and return its seats to the show.
    pub async fn cancel_booking(&self, user_id: UserId, booking_id: BookingId) -> Result<Refund, BookingError> {
        let current = self.get_booking(user_id, booking_id).await?;
        if current.is_cancelled() {
            return Err(BookingError::invalid_state("Booking already cancelled"));
        }
        let show = self.resolve_show(current.movie_id, current.show_id).await?;

        let ledger = &self.ledger;
        let booking = self
            .users
            .update_user(
                user_id,
                Box::new(move |user: &mut User| -> Result<Booking, BookingError> {
                    let booking = user
                        .booking_mut(booking_id)
                        .ok_or(BookingError::NotFound(Resource::Booking))?;
                    if booking.is_cancelled() {
                        return Err(BookingError::invalid_state("Booking already cancelled"));
                    }
                    ledger.release(&show, &mut *booking)?;
                    Ok(booking.clone())
                }),
            )
            .await?;

        tracing::info!(
            user_id,
            booking_id,
            seats = booking.seats,
            refund_amount = booking.total_amount,
            "Booking cancelled"
        );
        Ok(Refund {
            refund_amount: booking.total_amount,
            booking,
        })
    }

    pub async fn summary(&self, user_id: UserId) -> Result<BookingSummary, BookingError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(BookingError::NotFound(Resource::User))?;
        Ok(BookingSummary::for_user(&user))
    }

    async fn resolve_show(&self, movie_id: MovieId, show_id: ShowId) -> Result<Show, BookingError> {
        self.catalog
            .find_movie(movie_id)
            .await?
            .and_then(|movie| movie.show(show_id).cloned())
            .ok_or(BookingError::NotFound(Resource::Show))
    }
}
