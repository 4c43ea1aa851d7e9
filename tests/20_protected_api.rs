mod common;

use anyhow::Result;
use reqwest::StatusCode;

// The session wall needs no database: the middleware answers before any
// handler runs, so these assertions hold on a bare machine.

#[tokio::test]
async fn protected_routes_reject_anonymous_requests() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    for path in [
        "/api/auth/whoami",
        "/api/series",
        "/api/books",
        "/api/codex/characters",
    ] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {}", path);

        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], true, "path {}: {}", path, body);
        assert_eq!(body["code"], "UNAUTHORIZED", "path {}: {}", path, body);
    }

    Ok(())
}

#[tokio::test]
async fn forged_session_cookie_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/series", server.base_url))
        .header("Cookie", "access_token=not-a-real-token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn other_cookies_do_not_count_as_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/series", server.base_url))
        .header("Cookie", "theme=dark; other_access_token=abc")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_codex_kind_still_requires_a_session_first() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // The wall comes before kind lookup; anonymous callers cannot probe
    // which kinds exist.
    let res = client
        .get(format!("{}/api/codex/spaceships", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_cookie_even_without_a_session() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/logout", server.base_url))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with("access_token="), "{}", set_cookie);
    assert!(set_cookie.contains("Max-Age=0"), "{}", set_cookie);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    Ok(())
}
