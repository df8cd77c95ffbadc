pub mod ids;
pub mod identity;

pub use identity::CredentialHasher;
pub use ids::{BookingId, IdSequence, MovieId, ShowId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
    #[error("Identity verification failed: {0}")]
    IdentityError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
