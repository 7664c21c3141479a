//! End-to-end tests against a running server and database

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Suffix keeping records from separate runs apart
fn unique(label: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{} {}", label, nanos)
}

async fn get_html(client: &Client, path: &str) -> (StatusCode, String) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    (status, response.text().await.expect("Failed to read body"))
}

async fn post_form(client: &Client, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
    client
        .post(format!("{}{}", BASE_URL, path))
        .form(form)
        .send()
        .await
        .expect("Failed to send request")
}

/// Id from the first `href="{prefix}ID">{label}</a>` link in a list page
fn linked_id(html: &str, prefix: &str, label: &str) -> i32 {
    let anchor = format!("\">{}</a>", label);
    let end = html.find(&anchor).expect("row not listed");
    let start = html[..end].rfind(prefix).expect("row has no link") + prefix.len();
    html[start..end].parse().expect("link id is not a number")
}

async fn create_book(client: &Client, title: &str) -> i32 {
    let response = post_form(
        client,
        "/books/new",
        &[("title", title), ("author", "Test Author"), ("first_published", "1999")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, html) = get_html(client, &format!("/books?search={}", urlencoding::encode(title))).await;
    linked_id(&html, "/books/", title)
}

async fn create_patron(client: &Client, last_name: &str) -> i32 {
    let response = post_form(
        client,
        "/patrons/new",
        &[
            ("first_name", "Test"),
            ("last_name", last_name),
            ("email", "test.patron@example.com"),
            ("zip_code", "12345"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, html) = get_html(client, &format!("/patrons?search={}", urlencoding::encode(last_name))).await;
    linked_id(&html, "/patrons/", &format!("Test {}", last_name))
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let response = client()
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
async fn test_unknown_page_is_not_found() {
    let (status, html) = get_html(&client(), "/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page Not Found"));
}

#[tokio::test]
#[ignore]
async fn test_book_round_trip() {
    let client = client();
    let title = unique("Round Trip");
    let id = create_book(&client, &title).await;

    let (status, html) = get_html(&client, &format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(&format!("value=\"{}\"", title)));
    assert!(html.contains("value=\"Test Author\""));
    assert!(html.contains("value=\"1999\""));
}

#[tokio::test]
#[ignore]
async fn test_book_update_through_method_override() {
    let client = client();
    let title = unique("Before Update");
    let id = create_book(&client, &title).await;

    let renamed = unique("After Update");
    let response = post_form(
        &client,
        &format!("/books/{}", id),
        &[("_method", "PUT"), ("title", renamed.as_str()), ("author", "Test Author")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, html) = get_html(&client, &format!("/books/{}", id)).await;
    assert!(html.contains(&format!("value=\"{}\"", renamed)));
}

#[tokio::test]
#[ignore]
async fn test_patron_without_email_is_re_rendered() {
    let response = post_form(
        &client(),
        "/patrons/new",
        &[("first_name", "No"), ("last_name", "Email"), ("email", "")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.expect("Failed to read body");
    assert!(html.contains("Please provide an email address."));
    assert!(html.contains("value=\"Email\""));
}

#[tokio::test]
#[ignore]
async fn test_second_checkout_of_a_book_is_rejected() {
    let client = client();
    let book_id = create_book(&client, &unique("Popular Book")).await.to_string();
    let patron_id = create_patron(&client, &unique("Borrower")).await.to_string();
    let form = [("book_id", book_id.as_str()), ("patron_id", patron_id.as_str())];

    let first = post_form(&client, "/loans/new", &form).await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = post_form(&client, "/loans/new", &form).await;
    assert_eq!(second.status(), StatusCode::OK);
    let html = second.text().await.expect("Failed to read body");
    assert!(html.contains("Selected book is already checked out"));
}
