//! API integration tests
//!
//! Run against a locally started server seeded with the fixture data:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Token for a customer account. Mint one with the identity provider's dev
/// tooling (subject "acct-demo", role "customer").
fn customer_token() -> String {
    std::env::var("CASCARA_TEST_TOKEN").expect("CASCARA_TEST_TOKEN not set")
}

/// Token carrying the admin role.
fn admin_token() -> String {
    std::env::var("CASCARA_TEST_ADMIN_TOKEN").expect("CASCARA_TEST_ADMIN_TOKEN not set")
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
async fn test_my_order_stats_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/orders/stats", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_my_order_stats_shape() {
    let client = Client::new();

    let response = client
        .get(format!("{}/orders/stats", BASE_URL))
        .bearer_auth(customer_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["basic"]["total_orders"].is_i64());
    assert!(body["volume"]["kg_by_variety"].is_array());
    assert!(body["financial"]["spend_by_month"].is_array());
    assert!(body["time"].get("first_order_at").is_some());
    assert!(body["shipping"]["by_method"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_other_account_stats_forbidden_for_customer() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/acct-someone-else/orders/stats", BASE_URL))
        .bearer_auth(customer_token())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_admin_reads_any_account() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/acct-demo/orders/stats", BASE_URL))
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["basic"]["total_orders"].is_i64());
}

#[tokio::test]
#[ignore]
async fn test_unknown_account_gets_zero_report() {
    let client = Client::new();

    let response = client
        .get(format!("{}/users/acct-no-orders/orders/stats", BASE_URL))
        .bearer_auth(admin_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["basic"]["total_orders"], 0);
    assert!(body["time"]["first_order_at"].is_null());
    assert_eq!(body["volume"]["kg_by_variety"].as_array().unwrap().len(), 0);
}
