//! End-to-end HTTP tests: the full router over the in-memory backend,
//! served on an ephemeral port and exercised with a real client.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use catalog::{routes, state::AppState, storage::memory::InMemoryStorage};

async fn start_server() -> anyhow::Result<String> {
    let storage = Arc::new(InMemoryStorage::new());
    let state = AppState::new(storage.clone(), storage);
    let app = routes::create_router(state);

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(base_url)
}

async fn create_user(client: &reqwest::Client, base: &str, login: &str) -> anyhow::Result<Value> {
    let resp = client
        .post(format!("{base}/users"))
        .json(&json!({
            "email": format!("{login}@example.com"),
            "login": login,
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    Ok(resp.json().await?)
}

async fn create_film(client: &reqwest::Client, base: &str, name: &str) -> anyhow::Result<Value> {
    let resp = client
        .post(format!("{base}/films"))
        .json(&json!({
            "name": name,
            "description": "",
            "release_date": "2000-01-01",
            "duration": 90,
            "mpa": {"id": 1},
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    Ok(resp.json().await?)
}

#[tokio::test]
async fn user_crud_and_status_codes() -> anyhow::Result<()> {
    let base = start_server().await?;
    let client = reqwest::Client::new();

    let user = create_user(&client, &base, "alice").await?;
    assert_eq!(user["id"], 1);
    // Missing display name falls back to the login
    assert_eq!(user["name"], "alice");

    let resp = client.get(format!("{base}/users/1")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client.get(format!("{base}/users/99")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await?;
    assert!(body["error"].as_str().unwrap().contains("not found"));

    let resp = client
        .post(format!("{base}/users"))
        .json(&json!({"email": "no-at-sign", "login": "bob"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .put(format!("{base}/users"))
        .json(&json!({
            "id": 1,
            "email": "alice@example.org",
            "login": "alice",
            "name": "Alice",
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["email"], "alice@example.org");
    assert_eq!(updated["name"], "Alice");

    Ok(())
}

#[tokio::test]
async fn friendship_round_trip() -> anyhow::Result<()> {
    let base = start_server().await?;
    let client = reqwest::Client::new();

    create_user(&client, &base, "a").await?;
    create_user(&client, &base, "b").await?;
    create_user(&client, &base, "c").await?;

    for (user, friend) in [(1, 2), (1, 3), (2, 3)] {
        let resp = client
            .put(format!("{base}/users/{user}/friends/{friend}"))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let friends: Value = client
        .get(format!("{base}/users/1/friends"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(friends.as_array().unwrap().len(), 2);

    let common: Value = client
        .get(format!("{base}/users/1/friends/common/2"))
        .send()
        .await?
        .json()
        .await?;
    let common = common.as_array().unwrap();
    assert_eq!(common.len(), 1);
    assert_eq!(common[0]["id"], 3);

    let resp = client
        .delete(format!("{base}/users/1/friends/2"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let friends: Value = client
        .get(format!("{base}/users/1/friends"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(friends.as_array().unwrap().len(), 1);

    // Befriending a missing user is a 404
    let resp = client
        .put(format!("{base}/users/1/friends/99"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Befriending yourself is a 400
    let resp = client
        .put(format!("{base}/users/1/friends/1"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn likes_and_popular_films() -> anyhow::Result<()> {
    let base = start_server().await?;
    let client = reqwest::Client::new();

    create_user(&client, &base, "u1").await?;
    create_user(&client, &base, "u2").await?;
    create_film(&client, &base, "f1").await?;
    create_film(&client, &base, "f2").await?;
    create_film(&client, &base, "f3").await?;

    for (film, user) in [(2, 1), (2, 2), (3, 1)] {
        let resp = client
            .put(format!("{base}/films/{film}/like/{user}"))
            .send()
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let popular: Value = client
        .get(format!("{base}/films/popular?count=2"))
        .send()
        .await?
        .json()
        .await?;
    let ids: Vec<i64> = popular
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3]);

    // Default count returns every film here, zero-like ones last
    let popular: Value = client
        .get(format!("{base}/films/popular"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(popular.as_array().unwrap().len(), 3);

    let resp = client
        .get(format!("{base}/films/popular?count=-1"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Liking a missing film is a 404
    let resp = client.put(format!("{base}/films/99/like/1")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .delete(format!("{base}/films/2/like/1"))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn film_validation_and_reference_data() -> anyhow::Result<()> {
    let base = start_server().await?;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/films"))
        .json(&json!({
            "name": "too old",
            "description": "",
            "release_date": "1890-01-01",
            "duration": 90,
            "mpa": {"id": 1},
        }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let genres: Value = client
        .get(format!("{base}/genres"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(genres.as_array().unwrap().len(), 6);

    let mpa: Value = client
        .get(format!("{base}/mpa/3"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(mpa["name"], "PG-13");

    let resp = client.get(format!("{base}/mpa/99")).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client.get(format!("{base}/health")).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
