//! API integration tests
//!
//! These run against a live server with a freshly migrated database seeded
//! by the `seed` binary (users: librarian/librarian with both grants,
//! reader/reader with none). Run with: cargo test -- --ignored

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Client that surfaces redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Helper to log in and get a bearer token
async fn get_auth_token(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = client();

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
    let client = client();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "librarian"
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
    let client = client();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "librarian",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_redirects_to_login_with_next() {
    let client = client();

    let response = client
        .get(format!("{}/loans/mine", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    // Missing authentication redirects rather than failing hard
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("No Location header");
    assert!(location.starts_with("/accounts/login"));
    assert!(location.contains("next="));
}

#[tokio::test]
#[ignore]
async fn test_all_loans_without_permission_is_forbidden() {
    let client = client();
    let token = get_auth_token(&client, "reader", "reader").await;

    let response = client
        .get(format!("{}/loans", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    // Authenticated but lacking the grant: hard denial, no redirect
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_catalog_modification_without_permission_is_forbidden() {
    let client = client();
    let token = get_auth_token(&client, "reader", "reader").await;

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "language": "English"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore]
async fn test_author_pagination_is_ten() {
    let client = client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    // 13 authors across two pages
    for n in 0..13 {
        let response = client
            .post(format!("{}/authors", BASE_URL))
            .header("Authorization", format!("Bearer {}", token))
            .json(&json!({
                "first_name": format!("Christian {}", n),
                "last_name": format!("Surname {}", n),
                "language": "English"
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body: Value = client
        .get(format!("{}/authors?page=1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);

    let body: Value = client
        .get(format!("{}/authors?page=2", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_renewal_round_trip() {
    let client = client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    // Book with one available copy
    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Renewal Test Book",
            "language": "English",
            "summary": "A book for testing renewals",
            "isbn": "9780000000001"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    let copy: Value = client
        .post(format!("{}/books/{}/instances", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "imprint": "Test Imprint, 2024",
            "status": "available"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let copy_id = copy["id"].as_str().expect("No copy ID").to_string();

    // Lend it out, then fetch the renewal proposal
    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let borrower_id = me["id"].as_i64().expect("No user ID");

    let response = client
        .post(format!("{}/instances/{}/checkout", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "borrower_id": borrower_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let proposal: Value = client
        .get(format!("{}/instances/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let proposed = proposal["proposed_renewal_date"]
        .as_str()
        .expect("No proposed date")
        .to_string();

    // Renew to the suggested date
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": proposed }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let renewed: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(renewed["due_back"].as_str().unwrap(), proposed);

    // A date far in the future is rejected with a distinguishable reason
    let response = client
        .post(format!("{}/instances/{}/renew", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": "2099-01-01" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("4 weeks"));

    // Cleanup (cascades to the copy)
    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_author_keeps_books() {
    let client = client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Ephemeral",
            "last_name": "Writer",
            "language": "English"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let author_id = author["id"].as_i64().expect("No author ID");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Orphaned Book",
            "language": "English",
            "summary": "Survives its author",
            "isbn": "9780000000002",
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The book remains, with the author reference nulled
    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(body["author_id"].is_null());

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_deleting_book_cascades_to_copies() {
    let client = client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Short-Lived Book",
            "language": "English",
            "summary": "Deleted along with its copies",
            "isbn": "9780000000003"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    let copy: Value = client
        .post(format!("{}/books/{}/instances", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "imprint": "Test Imprint, 2024",
            "status": "available"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let copy_id = copy["id"].as_str().expect("No copy ID").to_string();

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The copy went down with the book
    let response = client
        .get(format!("{}/instances/{}/renewal", BASE_URL, copy_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_my_loans_lists_own_loans_in_due_date_order() {
    let client = client();
    let librarian = get_auth_token(&client, "librarian", "librarian").await;
    let reader = get_auth_token(&client, "reader", "reader").await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let reader_id = me["id"].as_i64().expect("No user ID");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", librarian))
        .json(&json!({
            "title": "Borrowed Twice",
            "language": "English",
            "summary": "Two copies out to the same reader",
            "isbn": "9780000000004"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let book_id = book["id"].as_i64().expect("No book ID");

    // Two copies, lent to the reader with the later due date first
    let mut copy_ids = Vec::new();
    for due_back in ["2030-01-10", "2030-01-05"] {
        let copy: Value = client
            .post(format!("{}/books/{}/instances", BASE_URL, book_id))
            .header("Authorization", format!("Bearer {}", librarian))
            .json(&json!({
                "imprint": "Test Imprint, 2024",
                "status": "available"
            }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        let copy_id = copy["id"].as_str().expect("No copy ID").to_string();

        let response = client
            .post(format!("{}/instances/{}/checkout", BASE_URL, copy_id))
            .header("Authorization", format!("Bearer {}", librarian))
            .json(&json!({ "borrower_id": reader_id, "due_back": due_back }))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
        copy_ids.push(copy_id);
    }

    let body: Value = client
        .get(format!("{}/loans/mine", BASE_URL))
        .header("Authorization", format!("Bearer {}", reader))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["per_page"], 10);

    let items = body["items"].as_array().expect("No items array");
    for item in items {
        assert_eq!(item["status"], "on_loan");
        assert_eq!(item["borrower"]["id"].as_i64().unwrap(), reader_id);
    }

    // Ordered by due date: the 2030-01-05 copy comes before the 2030-01-10 one
    let position = |id: &str| {
        items
            .iter()
            .position(|item| item["id"] == id)
            .expect("Loan missing from listing")
    };
    assert!(position(&copy_ids[1]) < position(&copy_ids[0]));

    let _ = client
        .delete(format!("{}/books/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", librarian))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_renewing_unknown_copy_is_not_found() {
    let client = client();
    let token = get_auth_token(&client, "librarian", "librarian").await;

    let response = client
        .post(format!(
            "{}/instances/00000000-0000-0000-0000-000000000000/renew",
            BASE_URL
        ))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "renewal_date": "2024-01-01" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_summary_counts_and_visits() {
    let client = client();

    let first: Value = client
        .get(format!("{}/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(first["num_books"].is_number());
    assert!(first["num_authors"].is_number());

    let second: Value = client
        .get(format!("{}/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(second["num_visits"].as_i64().unwrap() > first["num_visits"].as_i64().unwrap());
}
