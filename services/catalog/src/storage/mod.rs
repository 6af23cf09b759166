//! Storage contract for the catalog service
//!
//! The service layer depends only on these traits; the in-memory and
//! Postgres backends are interchangeable behind them.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Film, Genre, MpaRating, User};

pub mod memory;
pub mod postgres;

/// Canonical store of users and of the friendship edges between them
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Insert a user, assigning a fresh identifier. The id on the passed
    /// record is ignored.
    async fn create_user(&self, user: User) -> Result<User>;

    /// Update a user in place, keyed by id. Returns None when the id is
    /// unknown.
    async fn update_user(&self, user: User) -> Result<Option<User>>;

    async fn user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// All users, ordered by id
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Record the undirected friendship edge between two users.
    /// Idempotent; both ids must already exist.
    async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<()>;

    /// Remove the friendship edge if present. Idempotent.
    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<()>;

    /// Users adjacent to the given user, ordered by id
    async fn friends_of(&self, user_id: i64) -> Result<Vec<User>>;
}

/// Canonical store of films, likes, and the genre / MPA reference tables
#[async_trait]
pub trait FilmStorage: Send + Sync {
    /// Insert a film, assigning a fresh identifier. The id on the passed
    /// record is ignored.
    async fn create_film(&self, film: Film) -> Result<Film>;

    /// Update a film in place, keyed by id. Returns None when the id is
    /// unknown.
    async fn update_film(&self, film: Film) -> Result<Option<Film>>;

    async fn film_by_id(&self, id: i64) -> Result<Option<Film>>;

    /// All films, ordered by id
    async fn list_films(&self) -> Result<Vec<Film>>;

    /// Add the user to the film's liker set. Idempotent.
    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<()>;

    /// Remove the user from the film's liker set. Idempotent.
    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<()>;

    /// The `count` films with the largest liker sets, like count
    /// descending, ties broken by ascending film id
    async fn popular_films(&self, count: usize) -> Result<Vec<Film>>;

    async fn list_genres(&self) -> Result<Vec<Genre>>;

    async fn genre_by_id(&self, id: i32) -> Result<Option<Genre>>;

    async fn list_mpa(&self) -> Result<Vec<MpaRating>>;

    async fn mpa_by_id(&self, id: i32) -> Result<Option<MpaRating>>;
}
