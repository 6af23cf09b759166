//! Input validation utilities

use chrono::{NaiveDate, Utc};

use crate::models::{FilmUpdate, NewFilm, NewUser, UserUpdate};

/// Maximum length of a film description
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// The day cinema was born; no film can be released before it
pub fn earliest_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("valid calendar date")
}

/// Validate a user creation payload
pub fn validate_new_user(user: &NewUser) -> Result<(), String> {
    validate_user_fields(&user.email, &user.login, user.birthday)
}

/// Validate a user update payload
pub fn validate_user_update(user: &UserUpdate) -> Result<(), String> {
    validate_user_fields(&user.email, &user.login, user.birthday)
}

fn validate_user_fields(
    email: &str,
    login: &str,
    birthday: Option<NaiveDate>,
) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if !email.contains('@') {
        return Err("Email must contain '@'".to_string());
    }

    if login.is_empty() {
        return Err("Login is required".to_string());
    }

    if login.chars().any(char::is_whitespace) {
        return Err("Login must not contain whitespace".to_string());
    }

    if let Some(birthday) = birthday {
        if birthday > Utc::now().date_naive() {
            return Err("Birthday must not be in the future".to_string());
        }
    }

    Ok(())
}

/// Validate a film creation payload
pub fn validate_new_film(film: &NewFilm) -> Result<(), String> {
    validate_film_fields(&film.name, &film.description, film.release_date, film.duration)
}

/// Validate a film update payload
pub fn validate_film_update(film: &FilmUpdate) -> Result<(), String> {
    validate_film_fields(&film.name, &film.description, film.release_date, film.duration)
}

fn validate_film_fields(
    name: &str,
    description: &str,
    release_date: NaiveDate,
    duration: i32,
) -> Result<(), String> {
    if name.is_empty() {
        return Err("Film name is required".to_string());
    }

    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(format!(
            "Description must be at most {} characters long",
            MAX_DESCRIPTION_LEN
        ));
    }

    if release_date < earliest_release_date() {
        return Err("Release date must not be before 1895-12-28".to_string());
    }

    if duration <= 0 {
        return Err("Duration must be a positive number of minutes".to_string());
    }

    Ok(())
}

/// Resolve the display name: a blank or missing name falls back to the login
pub fn effective_name(login: &str, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => login.to_string(),
    }
}
