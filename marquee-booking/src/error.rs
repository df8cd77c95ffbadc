use marquee_catalog::InventoryError;
use marquee_core::CoreError;

/// Entity a lookup failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    User,
    Movie,
    Show,
    Booking,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::User => "User",
            Resource::Movie => "Movie",
            Resource::Show => "Show",
            Resource::Booking => "Booking",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(Resource),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidState(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        BookingError::InvalidState(message.into())
    }
}
