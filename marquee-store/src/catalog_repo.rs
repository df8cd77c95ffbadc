use async_trait::async_trait;
use marquee_catalog::{default_catalog, load_catalog, CatalogError, CatalogRepository, Movie};
use marquee_core::{CoreResult, MovieId};

/// Catalog held in memory for the life of the process.
pub struct InMemoryCatalogRepository {
    movies: Vec<Movie>,
}

impl InMemoryCatalogRepository {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Load from `seed_path` when given, otherwise use the bundled catalog.
    pub fn from_seed(seed_path: Option<&str>) -> Result<Self, CatalogError> {
        let movies = match seed_path {
            Some(path) => load_catalog(path)?,
            None => default_catalog()?,
        };
        let shows: usize = movies.iter().map(|m| m.shows.len()).sum();
        tracing::info!(movies = movies.len(), shows, source = seed_path.unwrap_or("bundled"), "Catalog loaded");
        Ok(Self::new(movies))
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_movies(&self) -> CoreResult<Vec<Movie>> {
        Ok(self.movies.clone())
    }

    async fn find_movie(&self, movie_id: MovieId) -> CoreResult<Option<Movie>> {
        Ok(self.movies.iter().find(|m| m.id == movie_id).cloned())
    }
}
