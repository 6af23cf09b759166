//! Catalog service for the cinecircle application
//!
//! Tracks films, users, genres and MPA ratings, plus the social layer on
//! top of them: friendships between users and likes on films.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;
