pub mod app_config;
pub mod catalog_repo;
pub mod rate_limit;
pub mod user_repo;

pub use app_config::Config;
pub use catalog_repo::InMemoryCatalogRepository;
pub use rate_limit::FixedWindowRateLimiter;
pub use user_repo::InMemoryUserRepository;
