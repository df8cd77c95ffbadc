pub mod accounts;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use accounts::{sanitize_input, AccountService};
pub use error::{BookingError, Resource};
pub use models::{Booking, BookingStatus, BookingSummary, NewUser, Refund, User};
pub use repository::{UserMutation, UserRepository};
pub use service::BookingService;
