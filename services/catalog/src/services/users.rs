//! User service and the friend-graph engine
//!
//! Friendship is one undirected edge: adding it makes both users visible
//! in each other's friend lists, and removing it from either side removes
//! both directions. Add and remove are idempotent. The engine keeps no
//! state of its own; every view derives from the current storage snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::{NewUser, User, UserUpdate};
use crate::storage::UserStorage;
use crate::validation;

/// User service
#[derive(Clone)]
pub struct UserService {
    storage: Arc<dyn UserStorage>,
}

impl UserService {
    /// Create a new user service
    pub fn new(storage: Arc<dyn UserStorage>) -> Self {
        Self { storage }
    }

    /// Create a user, assigning a fresh identifier
    pub async fn create(&self, payload: NewUser) -> ApiResult<User> {
        validation::validate_new_user(&payload).map_err(ApiError::Validation)?;

        let name = validation::effective_name(&payload.login, payload.name.as_deref());
        let user = User {
            id: 0,
            email: payload.email,
            login: payload.login,
            name,
            birthday: payload.birthday,
        };

        Ok(self.storage.create_user(user).await?)
    }

    /// Update a user in place, keyed by id
    pub async fn update(&self, payload: UserUpdate) -> ApiResult<User> {
        validation::validate_user_update(&payload).map_err(ApiError::Validation)?;

        let name = validation::effective_name(&payload.login, payload.name.as_deref());
        let user = User {
            id: payload.id,
            email: payload.email,
            login: payload.login,
            name,
            birthday: payload.birthday,
        };

        self.storage
            .update_user(user)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user {} not found", payload.id)))
    }

    /// Get a user by id
    pub async fn get(&self, id: i64) -> ApiResult<User> {
        self.storage
            .user_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
    }

    /// All users, ordered by id
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        Ok(self.storage.list_users().await?)
    }

    /// Record a friendship between two users. Idempotent; both users must
    /// exist before anything is written.
    pub async fn add_friend(&self, user_id: i64, friend_id: i64) -> ApiResult<()> {
        if user_id == friend_id {
            return Err(ApiError::Validation(
                "a user cannot friend themselves".to_string(),
            ));
        }
        self.get(user_id).await?;
        self.get(friend_id).await?;

        Ok(self.storage.add_friend(user_id, friend_id).await?)
    }

    /// Remove a friendship if present. Silent no-op when the edge is
    /// absent; both users must exist.
    pub async fn remove_friend(&self, user_id: i64, friend_id: i64) -> ApiResult<()> {
        self.get(user_id).await?;
        self.get(friend_id).await?;

        Ok(self.storage.remove_friend(user_id, friend_id).await?)
    }

    /// The user's friends, resolved to full records, ordered by id
    pub async fn friends(&self, user_id: i64) -> ApiResult<Vec<User>> {
        self.get(user_id).await?;

        Ok(self.storage.friends_of(user_id).await?)
    }

    /// Intersection of two users' friend lists, ordered by id. Empty when
    /// either side has no friends.
    pub async fn common_friends(&self, user_id: i64, other_id: i64) -> ApiResult<Vec<User>> {
        self.get(user_id).await?;
        self.get(other_id).await?;

        let friends = self.storage.friends_of(user_id).await?;
        let other_ids: HashSet<i64> = self
            .storage
            .friends_of(other_id)
            .await?
            .into_iter()
            .map(|user| user.id)
            .collect();

        Ok(friends
            .into_iter()
            .filter(|user| other_ids.contains(&user.id))
            .collect())
    }
}
