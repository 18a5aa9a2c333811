//! API integration tests.
//!
//! These run against a live server with a seeded librarian account
//! (librarian/librarian). Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

/// Register a fresh patron and return (token, username)
async fn register_and_login(client: &Client) -> (String, String) {
    let username = format!("patron{}", unique_suffix());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "reading1",
            "confirm_password": "reading1"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "reading1" }))
        .send()
        .await
        .expect("Failed to send login request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    (token, username)
}

/// Helper to get a librarian token (seeded account)
async fn librarian_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "librarian"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a book with the given number of copies, returning its id
async fn create_book(client: &Client, token: &str, copies: i32) -> i64 {
    let suffix = unique_suffix() % 1_000_000_000;
    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Integration Test Book",
            "author": "T. Ester",
            "isbn": format!("978{:010}", suffix),
            "category": "technology",
            "total_copies": copies,
            "publication_date": "2021-06-15"
        }))
        .send()
        .await
        .expect("Failed to send create book request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No book ID")
}

async fn get_book(client: &Client, book_id: i64) -> Value {
    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
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
async fn test_register_password_mismatch() {
    let client = Client::new();
    let username = format!("patron{}", unique_suffix());

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "reading1",
            "confirm_password": "reading2"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_username() {
    let client = Client::new();
    let (_, username) = register_and_login(&client).await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("other{}@example.com", unique_suffix()),
            "password": "reading1",
            "confirm_password": "reading1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (_, username) = register_and_login(&client).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_registration_generates_card_number() {
    let client = Client::new();
    let (token, _) = register_and_login(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let card = body["profile"]["library_card_number"]
        .as_str()
        .expect("No card number");
    assert!(card.starts_with("LIB"));
    assert_eq!(card.len(), 9);
    assert_eq!(body["profile"]["is_librarian"], false);
}

#[tokio::test]
#[ignore]
async fn test_book_detail_404() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_list_books_is_public() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books?search=Integration&category=technology", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_add_book_requires_librarian() {
    let client = Client::new();
    let (patron, _) = register_and_login(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", patron))
        .json(&json!({
            "title": "Forbidden",
            "author": "N. Body",
            "isbn": "9780000000000",
            "category": "fiction",
            "publication_date": "2020-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_borrow_requires_authentication() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books/1/borrow", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return_round_trip() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;
    let (patron, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &librarian, 3).await;
    assert_eq!(get_book(&client, book_id).await["available_copies"], 3);

    // Borrow: one copy leaves the shelf
    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow ID");
    assert!(body["due_date"].is_string());
    assert_eq!(get_book(&client, book_id).await["available_copies"], 2);

    // Dashboard shows the active record
    let response = client
        .get(format!("{}/dashboard", BASE_URL))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send dashboard request");
    assert!(response.status().is_success());
    let records: Value = response.json().await.expect("Failed to parse response");
    let record = records
        .as_array()
        .expect("Dashboard is not an array")
        .iter()
        .find(|r| r["id"].as_i64() == Some(borrow_id))
        .expect("Borrow record missing from dashboard");
    assert_eq!(record["status"], "borrowed");
    assert_eq!(record["is_overdue"], false);

    // Return: the copy goes back
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "returned");
    assert_eq!(body["record"]["status"], "returned");
    assert!(body["record"]["return_date"].is_string());
    assert_eq!(get_book(&client, book_id).await["available_copies"], 3);
}

#[tokio::test]
#[ignore]
async fn test_borrow_fails_when_no_copies() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;
    let (first, _) = register_and_login(&client).await;
    let (second, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &librarian, 1).await;

    // First patron takes the only copy
    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", first))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    // Second patron is turned away, nothing changes
    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", second))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 409);
    let book = get_book(&client, book_id).await;
    assert_eq!(book["available_copies"], 0);
    assert_eq!(book["is_available"], false);
}

#[tokio::test]
#[ignore]
async fn test_borrow_same_book_twice_fails() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;
    let (patron, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &librarian, 2).await;

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send borrow request");
    assert_eq!(response.status(), 409);

    // Only the first borrow took a copy
    assert_eq!(get_book(&client, book_id).await["available_copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_return_twice_fails() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;
    let (patron, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &librarian, 1).await;

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send borrow request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow ID");

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send return request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 409);

    // The counter was not incremented twice
    assert_eq!(get_book(&client, book_id).await["available_copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_return_someone_elses_record_fails() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;
    let (owner, _) = register_and_login(&client).await;
    let (intruder, _) = register_and_login(&client).await;

    let book_id = create_book(&client, &librarian, 1).await;

    let response = client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .expect("Failed to send borrow request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let borrow_id = body["id"].as_i64().expect("No borrow ID");

    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .header("Authorization", format!("Bearer {}", intruder))
        .send()
        .await
        .expect("Failed to send return request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_refresh_is_idempotent() {
    let client = Client::new();
    let (patron, _) = register_and_login(&client).await;

    // Two consecutive reads yield identical statuses
    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let response = client
            .get(format!("{}/dashboard", BASE_URL))
            .header("Authorization", format!("Bearer {}", patron))
            .send()
            .await
            .expect("Failed to send dashboard request");
        assert!(response.status().is_success());
        let records: Value = response.json().await.expect("Failed to parse response");
        let statuses: Vec<String> = records
            .as_array()
            .expect("Dashboard is not an array")
            .iter()
            .map(|r| r["status"].as_str().unwrap_or_default().to_string())
            .collect();
        snapshots.push(statuses);
    }
    assert_eq!(snapshots[0], snapshots[1]);
}

#[tokio::test]
#[ignore]
async fn test_home_stats() {
    let client = Client::new();

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_books"].is_number());
    assert!(body["available_books"].is_number());
    assert!(body["total_users"].is_number());
    assert!(body["total_borrowed"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_librarian_stats_forbidden_for_patrons() {
    let client = Client::new();
    let (patron, _) = register_and_login(&client).await;

    let response = client
        .get(format!("{}/librarian", BASE_URL))
        .header("Authorization", format!("Bearer {}", patron))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_librarian_stats() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;

    let response = client
        .get(format!("{}/librarian", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total_copies"].is_number());
    assert!(body["active_borrows"].is_number());
    assert!(body["overdue_borrows"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_conflict() {
    let client = Client::new();
    let librarian = librarian_token(&client).await;

    let isbn = format!("978{:010}", unique_suffix() % 1_000_000_000);
    let payload = json!({
        "title": "Same Book",
        "author": "A. Uthor",
        "isbn": isbn,
        "category": "history",
        "publication_date": "1999-01-01"
    });

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}
