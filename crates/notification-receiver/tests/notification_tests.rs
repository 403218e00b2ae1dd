//! Notification receiver integration tests.
//!
//! Every request to the webhook endpoint, whatever its method or body, is
//! acknowledged with 200 and the fixed text.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use fairway_test_utils::TestReceiverServer;
use notification_receiver::handlers::ACKNOWLEDGMENT;
use reqwest::{Client, Method};

async fn assert_acknowledged(response: reqwest::Response) -> Result<()> {
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, ACKNOWLEDGMENT);
    Ok(())
}

#[tokio::test]
async fn test_empty_body_is_acknowledged() -> Result<()> {
    let server = TestReceiverServer::spawn().await?;

    let response = Client::new()
        .post(format!("{}/notifications", server.url()))
        .send()
        .await?;

    assert_acknowledged(response).await
}

#[tokio::test]
async fn test_malformed_json_is_acknowledged() -> Result<()> {
    let server = TestReceiverServer::spawn().await?;

    let response = Client::new()
        .post(format!("{}/notifications", server.url()))
        .header("content-type", "application/json")
        .body("{\"signedPayload\": ")
        .send()
        .await?;

    assert_acknowledged(response).await
}

#[tokio::test]
async fn test_oversized_body_is_acknowledged() -> Result<()> {
    let server = TestReceiverServer::spawn().await?;
    let body = vec![b'x'; 8 * 1024 * 1024];

    let response = Client::new()
        .post(format!("{}/notifications", server.url()))
        .header("content-type", "application/octet-stream")
        .body(body)
        .send()
        .await?;

    assert_acknowledged(response).await
}

#[tokio::test]
async fn test_any_method_is_acknowledged() -> Result<()> {
    let server = TestReceiverServer::spawn().await?;
    let client = Client::new();
    let custom = Method::from_bytes(b"NOTIFY")?;

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, custom] {
        let response = client
            .request(method, format!("{}/notifications", server.url()))
            .body("payload")
            .send()
            .await?;

        assert_acknowledged(response).await?;
    }

    Ok(())
}

#[tokio::test]
async fn test_nested_path_is_acknowledged() -> Result<()> {
    let server = TestReceiverServer::spawn().await?;

    let response = Client::new()
        .post(format!("{}/notifications/app-store/v2", server.url()))
        .body("{}")
        .send()
        .await?;

    assert_acknowledged(response).await
}
