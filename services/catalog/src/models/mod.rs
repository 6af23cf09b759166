//! Catalog service models

pub mod film;
pub mod user;

// Re-export for convenience
pub use film::{Film, FilmUpdate, Genre, IdRef, MpaRating, NewFilm};
pub use user::{NewUser, User, UserUpdate};
