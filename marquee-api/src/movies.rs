use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use marquee_catalog::{InventoryLedger, Movie, Show};
use marquee_core::{MovieId, ShowId};
use serde::Serialize;

use crate::error::AppError;
use crate::params::path_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowView {
    show_id: ShowId,
    time: String,
    price_per_seat: u64,
    available_seats: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    id: MovieId,
    title: String,
    genre: String,
    duration: u32,
    shows: Vec<ShowView>,
}

#[derive(Debug, Serialize)]
struct MoviesResponse {
    movies: Vec<MovieView>,
    count: usize,
}

impl MovieView {
    /// Catalog entry joined with the live seat counters.
    fn with_availability(movie: Movie, ledger: &InventoryLedger) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
            duration: movie.duration,
            shows: movie
                .shows
                .into_iter()
                .map(|show| ShowView::with_availability(show, ledger))
                .collect(),
        }
    }
}

impl ShowView {
    fn with_availability(show: Show, ledger: &InventoryLedger) -> Self {
        Self {
            available_seats: ledger.available(show.show_id).unwrap_or(0),
            show_id: show.show_id,
            time: show.time,
            price_per_seat: show.price_per_seat,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{movie_id}/shows", get(movie_shows))
}

async fn list_movies(State(state): State<AppState>) -> Result<Json<MoviesResponse>, AppError> {
    let movies: Vec<MovieView> = state
        .catalog
        .list_movies()
        .await
        .map_err(anyhow::Error::from)?
        .into_iter()
        .map(|movie| MovieView::with_availability(movie, &state.ledger))
        .collect();

    Ok(Json(MoviesResponse {
        count: movies.len(),
        movies,
    }))
}

async fn movie_shows(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Json<MovieView>, AppError> {
    let movie_not_found = || AppError::NotFoundError("Movie not found".to_string());
    let movie_id: MovieId = path_id(&movie_id, "Invalid movie ID")?.ok_or_else(movie_not_found)?;

    let movie = state
        .catalog
        .find_movie(movie_id)
        .await
        .map_err(anyhow::Error::from)?
        .ok_or_else(movie_not_found)?;

    Ok(Json(MovieView::with_availability(movie, &state.ledger)))
}
