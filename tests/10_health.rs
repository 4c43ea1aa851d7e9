mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // OK with a database, SERVICE_UNAVAILABLE without one; both prove the
    // server is alive and answering JSON.
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    assert!(body.get("success").is_some(), "missing success field: {}", body);
    Ok(())
}

#[tokio::test]
async fn root_endpoint_lists_routes() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Storykeep API");
    assert!(body["data"]["endpoints"]["codex"]
        .as_str()
        .is_some_and(|route| route.contains("/api/codex/:kind")));
    Ok(())
}
