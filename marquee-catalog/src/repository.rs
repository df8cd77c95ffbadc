use async_trait::async_trait;
use marquee_core::{CoreResult, MovieId};

use crate::movie::Movie;

/// Read access to the movie catalog.
///
/// The catalog is static after startup; seat counters are not part of it and live in the
/// [`InventoryLedger`](crate::InventoryLedger).
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_movies(&self) -> CoreResult<Vec<Movie>>;

    async fn find_movie(&self, movie_id: MovieId) -> CoreResult<Option<Movie>>;
}
