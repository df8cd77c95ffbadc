pub mod auth;
pub mod rate_limit;

pub use auth::{AuthUser, UserClaims};
pub use rate_limit::{login_rate_limit, signup_rate_limit};
