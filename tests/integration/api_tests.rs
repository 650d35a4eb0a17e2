//! API integration tests
//!
//! These run against a live server on localhost:8080 backed by a migrated
//! database. The server and the tests share `LIBRARY_ADMIN__PASSWORD`.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn admin_password() -> String {
    std::env::var("LIBRARY_ADMIN__PASSWORD").unwrap_or_else(|_| "admin".to_string())
}

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": admin_password()
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn post_json(client: &Client, token: &str, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201, "POST {} failed", path);
    response.json().await.expect("Failed to parse response")
}

async fn rental_audits(client: &Client, token: &str, rental_id: i64) -> Vec<Value> {
    let response = client
        .get(format!("{}/rentals/{}/audits", BASE_URL, rental_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    body.as_array().cloned().unwrap_or_default()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": admin_password()
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "login": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_rental_lifecycle_is_audited() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let book = post_json(
        &client,
        &token,
        "/books",
        json!({ "title": "Solaris", "author": "Stanislaw Lem", "publication_year": 1961 }),
    )
    .await;
    let copy = post_json(&client, &token, "/copies", json!({ "book_id": book["id"] })).await;
    let reader = post_json(
        &client,
        &token,
        "/readers",
        json!({ "firstname": "Ada", "lastname": "Lovelace" }),
    )
    .await;

    let rental = post_json(
        &client,
        &token,
        "/rentals",
        json!({
            "copy_id": copy["id"],
            "reader_id": reader["id"],
            "rented_from": "2024-01-01",
            "rented_to": "2024-01-14"
        }),
    )
    .await;
    let rental_id = rental["id"].as_i64().expect("No rental id");

    let audits = rental_audits(&client, &token, rental_id).await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0]["event_type"], "INSERT");
    assert_eq!(audits[0]["aud_owner"], "admin");
    assert_eq!(audits[0]["new_return"], "2024-01-14");
    assert!(audits[0]["old_copy_id"].is_null());

    let response = client
        .put(format!("{}/rentals/{}/complete", BASE_URL, rental_id))
        .bearer_auth(&token)
        .json(&json!({
            "copy_id": copy["id"],
            "reader_id": reader["id"],
            "rented_from": "2024-01-01",
            "rented_to": "2024-01-10"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Newest first
    let audits = rental_audits(&client, &token, rental_id).await;
    assert_eq!(audits.len(), 2);
    assert_eq!(audits[0]["event_type"], "UPDATE");
    assert_eq!(audits[0]["old_return"], "2024-01-14");
    assert_eq!(audits[0]["new_return"], "2024-01-10");

    let response = client
        .delete(format!("{}/rentals/{}", BASE_URL, rental_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let audits = rental_audits(&client, &token, rental_id).await;
    assert_eq!(audits.len(), 3);
    assert_eq!(audits[0]["event_type"], "DELETE");
    assert_eq!(audits[0]["old_copy_id"], copy["id"]);
    assert!(audits[0]["new_copy_id"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_delete_missing_rental_is_not_found() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .delete(format!("{}/rentals/{}", BASE_URL, i32::MAX))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
    assert!(rental_audits(&client, &token, i32::MAX as i64).await.is_empty());
}

async fn create_copy_and_reader(client: &Client, token: &str) -> (Value, Value) {
    let book = post_json(
        client,
        token,
        "/books",
        json!({ "title": "The Cyberiad", "author": "Stanislaw Lem" }),
    )
    .await;
    let copy = post_json(client, token, "/copies", json!({ "book_id": book["id"] })).await;
    let reader = post_json(
        client,
        token,
        "/readers",
        json!({ "firstname": "Grace", "lastname": "Hopper" }),
    )
    .await;
    (copy, reader)
}

#[tokio::test]
#[ignore]
async fn test_concurrent_rentals_of_one_copy() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (copy, reader) = create_copy_and_reader(&client, &token).await;

    let rent = || {
        client
            .post(format!("{}/rentals", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({ "copy_id": copy["id"], "reader_id": reader["id"] }))
            .send()
    };
    let (first, second) = tokio::join!(rent(), rent());
    let mut statuses = vec![
        first.expect("Failed to send request").status().as_u16(),
        second.expect("Failed to send request").status().as_u16(),
    ];
    statuses.sort();

    assert_eq!(statuses, vec![201, 422]);
}

#[tokio::test]
#[ignore]
async fn test_complete_onto_rented_copy_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let (first_copy, reader) = create_copy_and_reader(&client, &token).await;
    let (second_copy, _) = create_copy_and_reader(&client, &token).await;

    let first = post_json(
        &client,
        &token,
        "/rentals",
        json!({ "copy_id": first_copy["id"], "reader_id": reader["id"], "rented_from": "2024-01-01" }),
    )
    .await;
    post_json(
        &client,
        &token,
        "/rentals",
        json!({ "copy_id": second_copy["id"], "reader_id": reader["id"], "rented_from": "2024-01-01" }),
    )
    .await;

    let response = client
        .put(format!("{}/rentals/{}/complete", BASE_URL, first["id"]))
        .bearer_auth(&token)
        .json(&json!({
            "copy_id": second_copy["id"],
            "reader_id": reader["id"],
            "rented_from": "2024-01-01",
            "rented_to": "2024-01-10"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    let response = client
        .get(format!("{}/copies/{}", BASE_URL, second_copy["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "rented");

    let rental_id = first["id"].as_i64().expect("No rental id");
    let audits = rental_audits(&client, &token, rental_id).await;
    assert_eq!(audits.len(), 1);
    assert_eq!(audits[0]["event_type"], "INSERT");
}
