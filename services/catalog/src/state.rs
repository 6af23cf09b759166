//! Application state shared across handlers

use std::sync::Arc;

use crate::services::{FilmService, UserService};
use crate::storage::{FilmStorage, UserStorage};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub film_service: FilmService,
}

impl AppState {
    /// Wire the services over a pair of storage handles
    pub fn new(users: Arc<dyn UserStorage>, films: Arc<dyn FilmStorage>) -> Self {
        Self {
            user_service: UserService::new(users.clone()),
            film_service: FilmService::new(films, users),
        }
    }
}
