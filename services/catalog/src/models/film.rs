//! Film model, genre and MPA rating reference data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Film entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    /// Duration in minutes
    pub duration: i32,
    /// Deduplicated, ordered by genre id
    pub genres: Vec<Genre>,
    pub mpa: MpaRating,
}

/// Film genre, a static reference entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    /// The full genre reference table
    pub fn all() -> Vec<Genre> {
        GENRE_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| Genre {
                id: i as i32 + 1,
                name: (*name).to_string(),
            })
            .collect()
    }

    /// Look up a genre by id
    pub fn by_id(id: i32) -> Option<Genre> {
        if id < 1 || id as usize > GENRE_NAMES.len() {
            return None;
        }
        Some(Genre {
            id,
            name: GENRE_NAMES[id as usize - 1].to_string(),
        })
    }
}

const GENRE_NAMES: [&str; 6] = [
    "Comedy",
    "Drama",
    "Cartoon",
    "Thriller",
    "Documentary",
    "Action",
];

/// MPA content rating, a static reference entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MpaRating {
    pub id: i32,
    pub name: String,
}

impl MpaRating {
    /// The full MPA rating reference table
    pub fn all() -> Vec<MpaRating> {
        MPA_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| MpaRating {
                id: i as i32 + 1,
                name: (*name).to_string(),
            })
            .collect()
    }

    /// Look up an MPA rating by id
    pub fn by_id(id: i32) -> Option<MpaRating> {
        if id < 1 || id as usize > MPA_NAMES.len() {
            return None;
        }
        Some(MpaRating {
            id,
            name: MPA_NAMES[id as usize - 1].to_string(),
        })
    }
}

const MPA_NAMES: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

/// Reference to a genre or MPA rating by id, as sent in film payloads
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i32,
}

/// New film creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewFilm {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    #[serde(default)]
    pub genres: Vec<IdRef>,
    pub mpa: IdRef,
}

/// Film update payload, keyed by id
#[derive(Debug, Clone, Deserialize)]
pub struct FilmUpdate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    pub duration: i32,
    #[serde(default)]
    pub genres: Vec<IdRef>,
    pub mpa: IdRef,
}
