mod common;

use axum_test::TestServer;
use carrier_rates::domain::repositories::TokenRepository;
use common::{InMemoryCarrierRepository, InMemoryTokenRepository, TEST_TOKEN};
use serde_json::Value;
use std::sync::Arc;

fn server_with_tokens(tokens: Arc<InMemoryTokenRepository>) -> TestServer {
    let state = common::create_test_state(Arc::new(InMemoryCarrierRepository::default()), tokens);
    TestServer::new(common::create_test_app(state)).unwrap()
}

#[tokio::test]
async fn test_missing_bearer_is_unauthorized() {
    let (server, _) = common::create_test_server();

    let response = server.get("/api/v1/carriers").await;

    response.assert_status_unauthorized();
    assert_eq!(response.header("www-authenticate"), "Bearer");
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let (server, _) = common::create_test_server();

    server
        .get("/api/v1/carriers/rates")
        .add_header("Authorization", "Bearer not-a-real-token")
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_revoked_token_is_unauthorized() {
    let tokens = Arc::new(InMemoryTokenRepository::with_token("tests", TEST_TOKEN));
    let token = tokens.find_by_name("tests").await.unwrap().unwrap();
    assert!(tokens.revoke(token.id).await.unwrap());

    let server = server_with_tokens(tokens);

    server
        .get("/api/v1/carriers")
        .add_header("Authorization", common::AUTH_HEADER)
        .await
        .assert_status_unauthorized();
}

#[tokio::test]
async fn test_valid_token_records_usage() {
    let tokens = Arc::new(InMemoryTokenRepository::with_token("tests", TEST_TOKEN));
    assert!(tokens.last_used("tests").is_none());

    let server = server_with_tokens(tokens.clone());

    server
        .get("/api/v1/carriers")
        .add_header("Authorization", common::AUTH_HEADER)
        .await
        .assert_status_ok();

    assert!(tokens.last_used("tests").is_some());
}

#[tokio::test]
async fn test_health_is_public() {
    let (server, _) = common::create_test_server();

    server.get("/health").await.assert_status_ok();
}
