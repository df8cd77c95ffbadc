pub mod inventory;
pub mod movie;
pub mod repository;
pub mod seed;

pub use inventory::{validate_quantity, InventoryError, InventoryLedger, SeatHold, SeatPool, MAX_SEATS_PER_BOOKING};
pub use movie::{Movie, Show};
pub use repository::CatalogRepository;
pub use seed::{default_catalog, load_catalog, parse_catalog, CatalogError};
