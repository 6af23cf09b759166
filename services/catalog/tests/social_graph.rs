//! Service-level tests for the friend-graph engine, run against the
//! in-memory storage backend.

use std::sync::Arc;

use catalog::error::ApiError;
use catalog::models::{NewUser, User};
use catalog::services::UserService;
use catalog::storage::memory::InMemoryStorage;

fn service() -> UserService {
    UserService::new(Arc::new(InMemoryStorage::new()))
}

async fn add_user(service: &UserService, login: &str) -> User {
    service
        .create(NewUser {
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: None,
            birthday: None,
        })
        .await
        .expect("user creation failed")
}

#[tokio::test]
async fn friendship_is_mutually_visible() {
    let service = service();
    let alice = add_user(&service, "alice").await;
    let bob = add_user(&service, "bob").await;

    service.add_friend(alice.id, bob.id).await.unwrap();

    let alice_friends = service.friends(alice.id).await.unwrap();
    let bob_friends = service.friends(bob.id).await.unwrap();
    assert_eq!(alice_friends, vec![bob.clone()]);
    assert_eq!(bob_friends, vec![alice.clone()]);

    // Re-adding the same edge is a no-op, not an error
    service.add_friend(bob.id, alice.id).await.unwrap();
    assert_eq!(service.friends(alice.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn remove_friend_is_idempotent() {
    let service = service();
    let alice = add_user(&service, "alice").await;
    let bob = add_user(&service, "bob").await;

    // Removing an edge that never existed is silent
    service.remove_friend(alice.id, bob.id).await.unwrap();

    service.add_friend(alice.id, bob.id).await.unwrap();
    service.remove_friend(alice.id, bob.id).await.unwrap();
    service.remove_friend(alice.id, bob.id).await.unwrap();

    assert!(service.friends(alice.id).await.unwrap().is_empty());
    assert!(service.friends(bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn common_friends_scenario() {
    let service = service();
    let a = add_user(&service, "a").await;
    let b = add_user(&service, "b").await;
    let c = add_user(&service, "c").await;

    service.add_friend(a.id, b.id).await.unwrap();
    service.add_friend(a.id, c.id).await.unwrap();
    service.add_friend(b.id, c.id).await.unwrap();

    let common = service.common_friends(a.id, b.id).await.unwrap();
    assert_eq!(common, vec![c]);
}

#[tokio::test]
async fn common_friends_is_a_subset_of_both_sides() {
    let service = service();
    let a = add_user(&service, "a").await;
    let b = add_user(&service, "b").await;
    let c = add_user(&service, "c").await;
    let d = add_user(&service, "d").await;

    service.add_friend(a.id, c.id).await.unwrap();
    service.add_friend(a.id, d.id).await.unwrap();
    service.add_friend(b.id, c.id).await.unwrap();

    let a_friends = service.friends(a.id).await.unwrap();
    let b_friends = service.friends(b.id).await.unwrap();
    let common = service.common_friends(a.id, b.id).await.unwrap();

    for user in &common {
        assert!(a_friends.contains(user));
        assert!(b_friends.contains(user));
    }
    assert_eq!(common.len(), 1);
}

#[tokio::test]
async fn common_friends_is_empty_when_one_side_has_none() {
    let service = service();
    let a = add_user(&service, "a").await;
    let b = add_user(&service, "b").await;
    let c = add_user(&service, "c").await;

    service.add_friend(a.id, c.id).await.unwrap();

    let common = service.common_friends(a.id, b.id).await.unwrap();
    assert!(common.is_empty());
}

#[tokio::test]
async fn add_friend_with_unknown_friend_leaves_state_unchanged() {
    let service = service();
    let alice = add_user(&service, "alice").await;

    let err = service.add_friend(alice.id, 999).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    assert!(service.friends(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn self_friendship_is_rejected() {
    let service = service();
    let alice = add_user(&service, "alice").await;

    let err = service.add_friend(alice.id, alice.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(service.friends(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn friends_of_unknown_user_is_not_found() {
    let service = service();

    let err = service.friends(42).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn blank_name_falls_back_to_login() {
    let service = service();

    let user = service
        .create(NewUser {
            email: "carol@example.com".to_string(),
            login: "carol".to_string(),
            name: Some("   ".to_string()),
            birthday: None,
        })
        .await
        .unwrap();

    assert_eq!(user.name, "carol");
}

#[tokio::test]
async fn update_of_unknown_user_is_not_found() {
    let service = service();

    let err = service
        .update(catalog::models::UserUpdate {
            id: 7,
            email: "ghost@example.com".to_string(),
            login: "ghost".to_string(),
            name: None,
            birthday: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}
