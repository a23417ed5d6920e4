mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{As, TestApp};
use eventhub_api::types::Role;

#[tokio::test]
async fn health_and_root_are_public() -> Result<()> {
    let app = TestApp::new()?;

    let (status, body) = app.get("/health", &As::Anonymous).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));

    let (status, body) = app.get("/", &As::Anonymous).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    Ok(())
}

#[tokio::test]
async fn session_cookie_wins_over_header() -> Result<()> {
    let app = TestApp::new()?;
    let alice = app.user("alice@example.com", Role::EventManager).await;
    let bob = app.user("bob@example.com", Role::Contractor).await;
    let cookie = app.login(alice.id).await;

    let request = Request::builder()
        .uri("/api/auth/whoami")
        .header("cookie", format!("eh_session={}", cookie))
        .header("x-user-id", bob.id.to_string())
        .body(Body::empty())?;
    let (status, body) = app.send_request(request).await?;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["user"]["id"], json!(alice.id));
    assert_eq!(body["user"]["source"], json!("session"));
    Ok(())
}

#[tokio::test]
async fn bearer_token_resolves_identity() -> Result<()> {
    let app = TestApp::new()?;
    let carol = app.user("carol@example.com", Role::Admin).await;
    let token = app.bearer_for(carol.id)?;

    let (status, body) = app.get("/api/auth/whoami", &As::Bearer(token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], json!("admin"));
    assert_eq!(body["user"]["source"], json!("bearer"));
    Ok(())
}

#[tokio::test]
async fn header_fallback_resolves_existing_user() -> Result<()> {
    let app = TestApp::new()?;
    let dave = app.user("dave@example.com", Role::Contractor).await;

    let (status, body) = app.get("/api/auth/whoami", &As::Header(dave.id)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["source"], json!("header"));
    Ok(())
}

#[tokio::test]
async fn unknown_header_user_is_unauthenticated() -> Result<()> {
    let app = TestApp::new()?;

    let (status, body) = app.get("/api/auth/whoami", &As::Header(Uuid::new_v4())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("UNAUTHORIZED"));
    assert_eq!(body["requiresAuth"], json!(true));
    Ok(())
}

#[tokio::test]
async fn expired_session_is_reported_as_such() -> Result<()> {
    let app = TestApp::new()?;
    let erin = app.user("erin@example.com", Role::EventManager).await;
    app.store
        .insert_session(erin.id, "stale-cookie", chrono::Duration::minutes(-5))
        .await;

    let (status, body) = app
        .get("/api/auth/whoami", &As::Cookie("stale-cookie".into()))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("SESSION_EXPIRED"));
    Ok(())
}

#[tokio::test]
async fn logout_revokes_session() -> Result<()> {
    let app = TestApp::new()?;
    let frank = app.user("frank@example.com", Role::EventManager).await;
    let cookie = app.login(frank.id).await;

    let (status, body) = app.delete("/api/auth/session", &As::Cookie(cookie.clone())).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revoked"], json!(true));

    let (status, body) = app.get("/api/auth/whoami", &As::Cookie(cookie)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("SESSION_EXPIRED"));
    Ok(())
}

#[tokio::test]
async fn header_identity_can_be_disabled() -> Result<()> {
    let mut config = eventhub_api::config::AppConfig::development();
    config.security.allow_header_identity = false;
    let app = TestApp::with_config(config)?;
    let gina = app.user("gina@example.com", Role::EventManager).await;

    let (status, _) = app.get("/api/auth/whoami", &As::Header(gina.id)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() -> Result<()> {
    let app = TestApp::new()?;
    let hank = app.user("hank@example.com", Role::EventManager).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/events")
        .header("x-user-id", hank.id.to_string())
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = app.send_request(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("INVALID_JSON"));
    Ok(())
}
