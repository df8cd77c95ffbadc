use std::collections::HashSet;
use std::path::Path;

use crate::movie::Movie;

const DEFAULT_CATALOG: &str = include_str!("../data/movies.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog seed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate movie id in catalog: {0}")]
    DuplicateMovie(u64),

    #[error("Duplicate show id in catalog: {0}")]
    DuplicateShow(u64),
}

/// The catalog bundled with the binary.
pub fn default_catalog() -> Result<Vec<Movie>, CatalogError> {
    parse_catalog(DEFAULT_CATALOG)
}

/// Load a catalog from a JSON file on disk.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Movie>, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    parse_catalog(&raw)
}

/// Parse a JSON catalog. Movie ids must be unique, and show ids must be unique across the
/// whole catalog since bookings reference shows directly.
pub fn parse_catalog(raw: &str) -> Result<Vec<Movie>, CatalogError> {
    let movies: Vec<Movie> = serde_json::from_str(raw)?;

    let mut movie_ids = HashSet::new();
    let mut show_ids = HashSet::new();
    for movie in &movies {
        if !movie_ids.insert(movie.id) {
            return Err(CatalogError::DuplicateMovie(movie.id));
        }
        for show in &movie.shows {
            if !show_ids.insert(show.show_id) {
                return Err(CatalogError::DuplicateShow(show.show_id));
            }
        }
    }

    Ok(movies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_loads() {
        let movies = default_catalog().unwrap();
        assert_eq!(movies.len(), 50);
        assert_eq!(movies[0].title, "The Shawshank Redemption");

        let show = movies[0].show(101).unwrap();
        assert_eq!(show.price_per_seat, 200);
        assert_eq!(show.capacity, 50);
        assert!(movies.iter().flat_map(|m| &m.shows).all(|s| s.capacity == 50));
    }

    #[test]
    fn test_duplicate_show_rejected() {
        let raw = r#"[
            {"id": 1, "title": "A", "genre": "Drama", "duration": 90,
             "shows": [{"showId": 7, "time": "1:00 PM", "pricePerSeat": 100, "capacity": 10}]},
            {"id": 2, "title": "B", "genre": "Drama", "duration": 90,
             "shows": [{"showId": 7, "time": "3:00 PM", "pricePerSeat": 100, "capacity": 10}]}
        ]"#;
        assert!(matches!(parse_catalog(raw), Err(CatalogError::DuplicateShow(7))));
    }

    #[test]
    fn test_duplicate_movie_rejected() {
        let raw = r#"[
            {"id": 1, "title": "A", "genre": "Drama", "duration": 90, "shows": []},
            {"id": 1, "title": "B", "genre": "Drama", "duration": 90, "shows": []}
        ]"#;
        assert!(matches!(parse_catalog(raw), Err(CatalogError::DuplicateMovie(1))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(load_catalog("/nonexistent/movies.json"), Err(CatalogError::Io(_))));
    }
}
