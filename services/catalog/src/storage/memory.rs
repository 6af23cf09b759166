//! In-memory storage backend
//!
//! A single mutex guards the whole store. Every operation locks, does its
//! synchronous map work, and releases before returning; the lock is never
//! held across an await point.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::models::{Film, Genre, MpaRating, User};
use crate::storage::{FilmStorage, UserStorage};

#[derive(Default)]
struct CatalogStore {
    users: BTreeMap<i64, User>,
    films: BTreeMap<i64, Film>,
    /// Adjacency sets; an edge is present in both endpoints' sets
    friends: HashMap<i64, HashSet<i64>>,
    /// film id -> liker set
    likes: HashMap<i64, HashSet<i64>>,
    next_user_id: i64,
    next_film_id: i64,
}

/// In-memory storage backend implementing both storage contracts
#[derive(Default)]
pub struct InMemoryStorage {
    store: Mutex<CatalogStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, CatalogStore>> {
        self.store.lock().map_err(|_| anyhow!("storage mutex poisoned"))
    }
}

#[async_trait]
impl UserStorage for InMemoryStorage {
    async fn create_user(&self, mut user: User) -> Result<User> {
        let mut store = self.lock()?;
        store.next_user_id += 1;
        user.id = store.next_user_id;
        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<Option<User>> {
        let mut store = self.lock()?;
        if !store.users.contains_key(&user.id) {
            return Ok(None);
        }
        store.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let store = self.lock()?;
        Ok(store.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let store = self.lock()?;
        Ok(store.users.values().cloned().collect())
    }

    async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut store = self.lock()?;
        store.friends.entry(user_id).or_default().insert(friend_id);
        store.friends.entry(friend_id).or_default().insert(user_id);
        Ok(())
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let mut store = self.lock()?;
        if let Some(set) = store.friends.get_mut(&user_id) {
            set.remove(&friend_id);
        }
        if let Some(set) = store.friends.get_mut(&friend_id) {
            set.remove(&user_id);
        }
        Ok(())
    }

    async fn friends_of(&self, user_id: i64) -> Result<Vec<User>> {
        let store = self.lock()?;
        let mut friends: Vec<User> = store
            .friends
            .get(&user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| store.users.get(id).cloned())
            .collect();
        friends.sort_by_key(|user| user.id);
        Ok(friends)
    }
}

#[async_trait]
impl FilmStorage for InMemoryStorage {
    async fn create_film(&self, mut film: Film) -> Result<Film> {
        let mut store = self.lock()?;
        store.next_film_id += 1;
        film.id = store.next_film_id;
        store.films.insert(film.id, film.clone());
        Ok(film)
    }

    async fn update_film(&self, film: Film) -> Result<Option<Film>> {
        let mut store = self.lock()?;
        if !store.films.contains_key(&film.id) {
            return Ok(None);
        }
        store.films.insert(film.id, film.clone());
        Ok(Some(film))
    }

    async fn film_by_id(&self, id: i64) -> Result<Option<Film>> {
        let store = self.lock()?;
        Ok(store.films.get(&id).cloned())
    }

    async fn list_films(&self) -> Result<Vec<Film>> {
        let store = self.lock()?;
        Ok(store.films.values().cloned().collect())
    }

    async fn add_like(&self, film_id: i64, user_id: i64) -> Result<()> {
        let mut store = self.lock()?;
        store.likes.entry(film_id).or_default().insert(user_id);
        Ok(())
    }

    async fn remove_like(&self, film_id: i64, user_id: i64) -> Result<()> {
        let mut store = self.lock()?;
        if let Some(likers) = store.likes.get_mut(&film_id) {
            likers.remove(&user_id);
        }
        Ok(())
    }

    async fn popular_films(&self, count: usize) -> Result<Vec<Film>> {
        let store = self.lock()?;
        let mut ranked: Vec<(usize, &Film)> = store
            .films
            .values()
            .map(|film| {
                let like_count = store.likes.get(&film.id).map_or(0, |likers| likers.len());
                (like_count, film)
            })
            .collect();
        // BTreeMap iteration is id-ascending, and the sort is stable, so
        // ties keep ascending id order.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(ranked
            .into_iter()
            .take(count)
            .map(|(_, film)| film.clone())
            .collect())
    }

    async fn list_genres(&self) -> Result<Vec<Genre>> {
        Ok(Genre::all())
    }

    async fn genre_by_id(&self, id: i32) -> Result<Option<Genre>> {
        Ok(Genre::by_id(id))
    }

    async fn list_mpa(&self) -> Result<Vec<MpaRating>> {
        Ok(MpaRating::all())
    }

    async fn mpa_by_id(&self, id: i32) -> Result<Option<MpaRating>> {
        Ok(MpaRating::by_id(id))
    }
}
