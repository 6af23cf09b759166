//! User model and related payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

/// New user creation payload
///
/// The display name is optional; a blank or missing name falls back to
/// the login.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

/// User update payload, keyed by id
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub id: i64,
    pub email: String,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}
