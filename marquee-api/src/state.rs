use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use marquee_booking::{AccountService, BookingService, UserRepository};
use marquee_catalog::{CatalogRepository, InventoryLedger};
use marquee_store::{Config, FixedWindowRateLimiter, InMemoryCatalogRepository, InMemoryUserRepository};

use crate::password::Argon2Hasher;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone, Debug)]
pub struct RateLimits {
    pub signup_max_requests: u32,
    pub login_max_requests: u32,
    pub window: Duration,
}

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub bookings: Arc<BookingService>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub ledger: Arc<InventoryLedger>,
    pub rate_limiter: Arc<FixedWindowRateLimiter>,
    pub rate_limits: RateLimits,
    pub auth: AuthConfig,
    /// `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let catalog = InMemoryCatalogRepository::from_seed(config.catalog.seed_path.as_deref())?;
        let ledger = Arc::new(InventoryLedger::from_movies(catalog.movies()));
        let catalog: Arc<dyn CatalogRepository> = Arc::new(catalog);
        let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2Hasher::new(config.password.memory_kib, config.password.iterations)?);

        let cors_origin = match config.server.cors_origin.as_str() {
            "*" => None,
            origin => Some(origin.parse::<HeaderValue>()?),
        };

        Ok(Self {
            accounts: Arc::new(AccountService::new(users.clone(), hasher)),
            bookings: Arc::new(BookingService::new(users, catalog.clone(), ledger.clone())),
            catalog,
            ledger,
            rate_limiter: Arc::new(FixedWindowRateLimiter::new()),
            rate_limits: RateLimits {
                signup_max_requests: config.rate_limit.signup_max_requests,
                login_max_requests: config.rate_limit.login_max_requests,
                window: Duration::from_secs(config.rate_limit.window_seconds),
            },
            auth: AuthConfig {
                secret: config.auth.jwt_secret.clone(),
                expiration: config.auth.jwt_expiration_seconds,
            },
            cors_origin,
        })
    }
}
