//! Catalog service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    models::{FilmUpdate, NewFilm, NewUser, UserUpdate},
    services::films::DEFAULT_POPULAR_COUNT,
    state::AppState,
};

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(create_user).put(update_user).get(get_users))
        .route("/users/:id", get(get_user))
        .route(
            "/users/:id/friends/:friend_id",
            put(add_friend).delete(remove_friend),
        )
        .route("/users/:id/friends", get(get_friends))
        .route("/users/:id/friends/common/:other_id", get(get_common_friends))
        .route("/films", post(create_film).put(update_film).get(get_films))
        .route("/films/popular", get(get_popular_films))
        .route("/films/:id", get(get_film))
        .route(
            "/films/:id/like/:user_id",
            put(add_like).delete(remove_like),
        )
        .route("/genres", get(get_genres))
        .route("/genres/:id", get(get_genre))
        .route("/mpa", get(get_mpa_ratings))
        .route("/mpa/:id", get(get_mpa_rating))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog-service"
    }))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update an existing user
pub async fn update_user(
    State(state): State<AppState>,
    Json(payload): Json<UserUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_service.update(payload).await?;
    Ok(Json(user))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_service.list().await?;
    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.user_service.get(id).await?;
    Ok(Json(user))
}

/// Record a friendship between two users
pub async fn add_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state.user_service.add_friend(id, friend_id).await?;
    Ok(Json(json!({"status": "ok"})))
}

/// Remove a friendship between two users
pub async fn remove_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state.user_service.remove_friend(id, friend_id).await?;
    Ok(Json(json!({"status": "ok"})))
}

/// Get a user's friends
pub async fn get_friends(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let friends = state.user_service.friends(id).await?;
    Ok(Json(friends))
}

/// Get the friends two users have in common
pub async fn get_common_friends(
    State(state): State<AppState>,
    Path((id, other_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let friends = state.user_service.common_friends(id, other_id).await?;
    Ok(Json(friends))
}

/// Create a new film
pub async fn create_film(
    State(state): State<AppState>,
    Json(payload): Json<NewFilm>,
) -> Result<impl IntoResponse, ApiError> {
    let film = state.film_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(film)))
}

/// Update an existing film
pub async fn update_film(
    State(state): State<AppState>,
    Json(payload): Json<FilmUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let film = state.film_service.update(payload).await?;
    Ok(Json(film))
}

/// Get all films
pub async fn get_films(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let films = state.film_service.list().await?;
    Ok(Json(films))
}

/// Get a film by ID
pub async fn get_film(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let film = state.film_service.get(id).await?;
    Ok(Json(film))
}

/// Add a user's like to a film
pub async fn add_like(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state.film_service.add_like(id, user_id).await?;
    Ok(Json(json!({"status": "ok"})))
}

/// Remove a user's like from a film
pub async fn remove_like(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    state.film_service.remove_like(id, user_id).await?;
    Ok(Json(json!({"status": "ok"})))
}

/// Query parameters for the popular films listing
#[derive(Debug, Clone, Deserialize)]
pub struct PopularQuery {
    pub count: Option<i64>,
}

/// Get the most-liked films
pub async fn get_popular_films(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let count = match query.count {
        Some(count) if count < 0 => {
            return Err(ApiError::Validation(
                "count must not be negative".to_string(),
            ));
        }
        Some(count) => count as usize,
        None => DEFAULT_POPULAR_COUNT,
    };

    let films = state.film_service.popular(count).await?;
    Ok(Json(films))
}

/// Get the genre reference table
pub async fn get_genres(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let genres = state.film_service.genres().await?;
    Ok(Json(genres))
}

/// Get a genre by ID
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let genre = state.film_service.genre(id).await?;
    Ok(Json(genre))
}

/// Get the MPA rating reference table
pub async fn get_mpa_ratings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let ratings = state.film_service.mpa_list().await?;
    Ok(Json(ratings))
}

/// Get an MPA rating by ID
pub async fn get_mpa_rating(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let rating = state.film_service.mpa(id).await?;
    Ok(Json(rating))
}
