mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn signed_in_browser(
    server: &common::TestServer,
    tag: &str,
) -> Result<reqwest::Client> {
    let browser = common::browser()?;
    let email = format!("{}-{}@example.com", tag, uuid::Uuid::new_v4().simple());

    let res = browser
        .post(format!("{}/auth/register", server.base_url))
        .json(&json!({ "name": tag, "email": email, "password": "long-enough" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed");

    let res = browser
        .post(format!("{}/auth/login", server.base_url))
        .json(&json!({ "email": email, "password": "long-enough" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed");

    Ok(browser)
}

#[tokio::test]
async fn series_crud_roundtrip() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let browser = signed_in_browser(server, "series-crud").await?;

    // Create
    let res = browser
        .post(format!("{}/api/series", server.base_url))
        .json(&json!({ "title": "The Hollow Crown", "summary": "kings and rot" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let series_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["revision"], 1);

    // List includes it
    let res = browser
        .get(format!("{}/api/series", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|s| s["id"] == series_id.as_str()));

    // Get attaches the (empty) book list
    let res = browser
        .get(format!("{}/api/series/{}", server.base_url, series_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["books"], json!([]));

    // Patch: title changes, summary cleared by an explicit null
    let res = browser
        .patch(format!("{}/api/series/{}", server.base_url, series_id))
        .json(&json!({ "title": "The Hollow Crown, Revised", "summary": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["title"], "The Hollow Crown, Revised");
    assert!(body["data"]["summary"].is_null());
    assert_eq!(body["data"]["revision"], 2);

    // Delete, then the id answers with the uniform denial
    let res = browser
        .delete(format!("{}/api/series/{}", server.base_url, series_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = browser
        .get(format!("{}/api/series/{}", server.base_url, series_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn books_attach_to_owned_series_only() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let browser = signed_in_browser(server, "books").await?;

    let res = browser
        .post(format!("{}/api/series", server.base_url))
        .json(&json!({ "title": "Saltwater Annals" }))
        .send()
        .await?;
    let series_id = res.json::<serde_json::Value>().await?["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Standalone book: no series link
    let res = browser
        .post(format!("{}/api/books", server.base_url))
        .json(&json!({ "title": "Tidebreak" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["seriesId"].is_null());
    let standalone_id = body["data"]["id"].as_str().unwrap().to_string();

    // Book inside the series
    let res = browser
        .post(format!("{}/api/books", server.base_url))
        .json(&json!({ "title": "Undertow", "seriesId": series_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let in_series_id = res.json::<serde_json::Value>().await?["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // A series id the caller does not own is rejected before any write
    let res = browser
        .post(format!("{}/api/books", server.base_url))
        .json(&json!({ "title": "Orphan", "seriesId": uuid::Uuid::new_v4() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // ?seriesId= narrows the list
    let res = browser
        .get(format!(
            "{}/api/books?seriesId={}",
            server.base_url, series_id
        ))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let listed: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert!(listed.contains(&in_series_id.as_str()));
    assert!(!listed.contains(&standalone_id.as_str()));

    // Get attaches the series reference
    let res = browser
        .get(format!("{}/api/books/{}", server.base_url, in_series_id))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["series"]["id"], series_id.as_str());
    assert_eq!(body["data"]["series"]["title"], "Saltwater Annals");

    // The series view lists its book
    let res = browser
        .get(format!("{}/api/series/{}", server.base_url, series_id))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["books"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["id"] == in_series_id.as_str()));

    Ok(())
}

#[tokio::test]
async fn invalid_ids_answer_with_the_json_envelope() -> Result<()> {
    if !common::database_configured() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    }

    let server = common::ensure_server().await?;
    let browser = signed_in_browser(server, "bad-ids").await?;

    let res = browser
        .get(format!("{}/api/series/not-a-uuid", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "BAD_REQUEST");

    Ok(())
}
