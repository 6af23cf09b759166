//! Postgres storage backend
//!
//! Parameterized queries against the schema in `schema.sql`. A friendship
//! is stored once as a `(user_low, user_high)` row, so both directions of
//! the edge read from the same record. Multi-statement writes run inside a
//! single transaction.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::models::{Film, Genre, MpaRating, User};
use crate::storage::{FilmStorage, UserStorage};

/// Postgres storage backend implementing both storage contracts
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Create a new Postgres storage backend
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn film_from_row(row: &sqlx::postgres::PgRow, genres: Vec<Genre>) -> Film {
        Film {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            release_date: row.get("release_date"),
            duration: row.get("duration"),
            genres,
            mpa: MpaRating {
                id: row.get("mpa_id"),
                name: row.get("mpa_name"),
            },
        }
    }

    async fn genres_for(&self, film_id: i64) -> Result<Vec<Genre>> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.name
            FROM genres g
            JOIN film_genres fg ON fg.genre_id = g.id
            WHERE fg.film_id = $1
            ORDER BY g.id
            "#,
        )
        .bind(film_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Genre {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn attach_genres(&self, rows: Vec<sqlx::postgres::PgRow>) -> Result<Vec<Film>> {
        let mut films = Vec::with_capacity(rows.len());
        for row in &rows {
            let genres = self.genres_for(row.get("id")).await?;
            films.push(Self::film_from_row(row, genres));
        }
        Ok(films)
    }
}

#[async_trait]
impl UserStorage for PgStorage {
    async fn create_user(&self, user: User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, login, name, birthday)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, login, name, birthday
            "#,
        )
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, login = $3, name = $4, birthday = $5
            WHERE id = $1
            RETURNING id, email, login, name, birthday
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.login)
        .bind(&user.name)
        .bind(user.birthday)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, login, name, birthday
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, login, name, birthday
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO friendships (user_low, user_high)
            VALUES (LEAST($1, $2), GREATEST($1, $2))
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE user_low = LEAST($1, $2) AND user_high = GREATEST($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn friends_of(&self, user_id: i64) -> Result<Vec<User>> {
        let friends = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.login, u.name, u.birthday
            FROM users u
            JOIN friendships f
              ON (f.user_low = $1 AND u.id = f.user_high)
              OR (f.user_high = $1 AND u.id = f.user_low)
            WHERE u.id <> $1
            ORDER BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(friends)
    }
}

#[async_trait]
impl FilmStorage for PgStorage {
    async fn create_film(&self, film: Film) -> Result<Film> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO films (name, description, release_date, duration, mpa_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.id)
        .fetch_one(&mut *tx)
        .await?;

        for genre in &film.genres {
            sqlx::query("INSERT INTO film_genres (film_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Film { id, ..film })
    }

    async fn update_film(&self, film: Film) -> Result<Option<Film>> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE films
            SET name = $2, description = $3, release_date = $4, duration = $5, mpa_id = $6
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(film.id)
        .bind(&film.name)
        .bind(&film.description)
        .bind(film.release_date)
        .bind(film.duration)
        .bind(film.mpa.id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("DELETE FROM film_genres WHERE film_id = $1")
            .bind(film.id)
            .execute(&mut *tx)
            .await?;

        for genre in &film.genres {
            sqlx::query("INSERT INTO film_genres (film_id, genre_id) VALUES ($1, $2)")
                .bind(film.id)
                .bind(genre.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Some(film))
    }

    async fn film_by_id(&self, id: i64) -> Result<Option<Film>> {
        let row = sqlx::query(
            r#"
            SELECT f.id, f.name, f.description, f.release_date, f.duration,
                   f.mpa_id, m.name AS mpa_name
            FROM films f
            JOIN mpa_ratings m ON m.id = f.mpa_id
            WHERE f.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let genres = self.genres_for(id).await?;
                Ok(Some(Self::film_from_row(&row, genres)))
            }
            None => Ok(None),
        }
    }

    async fn list_films(&self) -> Result<Vec<Film>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.name, f.description, f.release_date, f.duration,
                   f.mpa_id, m.name AS mpa_name
            FROM films f
            JOIN mpa_ratings m ON m.id = f.mpa_id
            ORDER BY f.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.attach_genres(rows).await
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO film_likes (film_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(film_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM film_likes WHERE film_id = $1 AND user_id = $2")
            .bind(film_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn popular_films(&self, count: usize) -> Result<Vec<Film>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.name, f.description, f.release_date, f.duration,
                   f.mpa_id, m.name AS mpa_name
            FROM films f
            JOIN mpa_ratings m ON m.id = f.mpa_id
            LEFT JOIN film_likes l ON l.film_id = f.id
            GROUP BY f.id, m.name
            ORDER BY COUNT(l.user_id) DESC, f.id ASC
            LIMIT $1
            "#,
        )
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await?;

        self.attach_genres(rows).await
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let rows = sqlx::query("SELECT id, name FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Genre {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn genre_by_id(&self, id: i32) -> Result<Option<Genre>> {
        let row = sqlx::query("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Genre {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn list_mpa(&self) -> Result<Vec<MpaRating>> {
        let rows = sqlx::query("SELECT id, name FROM mpa_ratings ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| MpaRating {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    async fn mpa_by_id(&self, id: i32) -> Result<Option<MpaRating>> {
        let row = sqlx::query("SELECT id, name FROM mpa_ratings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| MpaRating {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }
}
