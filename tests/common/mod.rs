#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use eventhub_api::auth::{Claims, JwtIdentityProvider};
use eventhub_api::config::AppConfig;
use eventhub_api::database::models::User;
use eventhub_api::database::MemoryStore;
use eventhub_api::types::Role;
use eventhub_api::{router, AppState};

/// How a test request identifies its caller
#[derive(Debug, Clone)]
pub enum As {
    Anonymous,
    Header(Uuid),
    Cookie(String),
    Bearer(String),
}

/// Full router over an in-memory store
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
    router: Router,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::in_memory(config.clone(), store.clone())?;
        Ok(Self {
            store,
            config,
            router: router(state),
        })
    }

    pub async fn user(&self, email: &str, role: Role) -> User {
        self.store.insert_user(email, role).await
    }

    /// Create a live session and return its cookie value
    pub async fn login(&self, user_id: Uuid) -> String {
        let token = format!("session-{}", Uuid::new_v4());
        self.store
            .insert_session(user_id, &token, chrono::Duration::hours(1))
            .await;
        token
    }

    pub fn bearer_for(&self, user_id: Uuid) -> Result<String> {
        let provider = JwtIdentityProvider::new(self.config.security.jwt_secret.clone());
        Ok(provider.issue(&Claims::new(user_id, None, 1))?)
    }

    pub async fn send(&self, method: Method, uri: &str, who: &As, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        builder = match who {
            As::Anonymous => builder,
            As::Header(id) => builder.header("x-user-id", id.to_string()),
            As::Cookie(token) => builder.header(
                header::COOKIE,
                format!("{}={}", self.config.security.session_cookie, token),
            ),
            As::Bearer(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        };

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send_request(request).await
    }

    /// Send a hand-built request through the router
    pub async fn send_request(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, who: &As) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, uri, who, None).await
    }

    pub async fn post(&self, uri: &str, who: &As, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, uri, who, Some(body)).await
    }

    pub async fn put(&self, uri: &str, who: &As, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, uri, who, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, who: &As) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, uri, who, None).await
    }
}

/// Pull a uuid out of a response body by JSON pointer
pub fn id_at(body: &Value, pointer: &str) -> Result<Uuid> {
    let raw = body
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("no string at {} in {}", pointer, body))?;
    Ok(Uuid::parse_str(raw)?)
}
