use async_trait::async_trait;
use marquee_core::UserId;

use crate::error::BookingError;
use crate::models::{Booking, NewUser, User};

/// A mutation applied to one user's record while the store holds it exclusively.
pub type UserMutation<'a> = Box<dyn FnOnce(&mut User) -> Result<Booking, BookingError> + Send + 'a>;

/// Credential store: accounts and the bookings they own.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Email and username uniqueness (case-insensitive) is checked
    /// atomically with the insert; a clash yields [`BookingError::Conflict`].
    async fn insert_user(&self, new_user: NewUser) -> Result<User, BookingError>;

    /// Whether an account already holds this email or username, compared case-insensitively.
    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, BookingError>;

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, BookingError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BookingError>;

    async fn contains_user(&self, user_id: UserId) -> Result<bool, BookingError>;

    /// Run `mutation` against the user's record with exclusive access. A mutation that fails
    /// must leave the record untouched.
    async fn update_user(
        &self,
        user_id: UserId,
        mutation: UserMutation<'_>,
    ) -> Result<Booking, BookingError>;
}
