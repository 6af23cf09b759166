//! Film service and the likes / popularity engine
//!
//! Likes are idempotent in both directions: liking a film twice leaves one
//! like, removing an absent like is a silent no-op. Popularity is derived
//! from the current liker sets on every query.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{Film, FilmUpdate, Genre, IdRef, MpaRating, NewFilm};
use crate::storage::{FilmStorage, UserStorage};
use crate::validation;

/// Number of films `popular` returns when no count is given
pub const DEFAULT_POPULAR_COUNT: usize = 10;

/// Film service
#[derive(Clone)]
pub struct FilmService {
    films: Arc<dyn FilmStorage>,
    users: Arc<dyn UserStorage>,
}

impl FilmService {
    /// Create a new film service
    pub fn new(films: Arc<dyn FilmStorage>, users: Arc<dyn UserStorage>) -> Self {
        Self { films, users }
    }

    /// Create a film, assigning a fresh identifier
    pub async fn create(&self, payload: NewFilm) -> ApiResult<Film> {
        validation::validate_new_film(&payload).map_err(ApiError::Validation)?;

        let mpa = self.mpa(payload.mpa.id).await?;
        let genres = self.resolve_genres(&payload.genres).await?;
        let film = Film {
            id: 0,
            name: payload.name,
            description: payload.description,
            release_date: payload.release_date,
            duration: payload.duration,
            genres,
            mpa,
        };

        Ok(self.films.create_film(film).await?)
    }

    /// Update a film in place, keyed by id
    pub async fn update(&self, payload: FilmUpdate) -> ApiResult<Film> {
        validation::validate_film_update(&payload).map_err(ApiError::Validation)?;

        let mpa = self.mpa(payload.mpa.id).await?;
        let genres = self.resolve_genres(&payload.genres).await?;
        let film = Film {
            id: payload.id,
            name: payload.name,
            description: payload.description,
            release_date: payload.release_date,
            duration: payload.duration,
            genres,
            mpa,
        };

        self.films
            .update_film(film)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("film {} not found", payload.id)))
    }

    /// Get a film by id
    pub async fn get(&self, id: i64) -> ApiResult<Film> {
        self.films
            .film_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("film {id} not found")))
    }

    /// All films, ordered by id
    pub async fn list(&self) -> ApiResult<Vec<Film>> {
        Ok(self.films.list_films().await?)
    }

    /// Add the user to the film's liker set. Idempotent; both the film and
    /// the user must exist before anything is written.
    pub async fn add_like(&self, film_id: i64, user_id: i64) -> ApiResult<()> {
        self.get(film_id).await?;
        self.require_user(user_id).await?;

        Ok(self.films.add_like(film_id, user_id).await?)
    }

    /// Remove the user from the film's liker set. Silent no-op when the
    /// like is absent; both the film and the user must exist.
    pub async fn remove_like(&self, film_id: i64, user_id: i64) -> ApiResult<()> {
        self.get(film_id).await?;
        self.require_user(user_id).await?;

        Ok(self.films.remove_like(film_id, user_id).await?)
    }

    /// The `count` most-liked films, like count descending, ties by
    /// ascending film id. A count past the end returns all films.
    pub async fn popular(&self, count: usize) -> ApiResult<Vec<Film>> {
        Ok(self.films.popular_films(count).await?)
    }

    /// The genre reference table
    pub async fn genres(&self) -> ApiResult<Vec<Genre>> {
        Ok(self.films.list_genres().await?)
    }

    /// Look up a genre by id
    pub async fn genre(&self, id: i32) -> ApiResult<Genre> {
        self.films
            .genre_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("genre {id} not found")))
    }

    /// The MPA rating reference table
    pub async fn mpa_list(&self) -> ApiResult<Vec<MpaRating>> {
        Ok(self.films.list_mpa().await?)
    }

    /// Look up an MPA rating by id
    pub async fn mpa(&self, id: i32) -> ApiResult<MpaRating> {
        self.films
            .mpa_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("mpa rating {id} not found")))
    }

    async fn require_user(&self, user_id: i64) -> ApiResult<()> {
        self.users
            .user_by_id(user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))
    }

    /// Resolve genre references, dropping duplicates and ordering by id
    async fn resolve_genres(&self, refs: &[IdRef]) -> ApiResult<Vec<Genre>> {
        let mut resolved = BTreeMap::new();
        for genre_ref in refs {
            let genre = self.genre(genre_ref.id).await?;
            resolved.insert(genre.id, genre);
        }
        Ok(resolved.into_values().collect())
    }
}
