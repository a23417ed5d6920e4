use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "name": "EventHub API",
        "version": version,
        "description": "Event-services marketplace API for event managers, contractors and admins",
        "endpoints": {
            "auth": "/api/auth/whoami, /api/auth/session",
            "events": "/api/events[/:id][/team-members|/tasks]",
            "team_members": "/api/team-members[/:id]",
            "tasks": "/api/tasks/:id[/attachments/:file_name]",
            "jobs": "/api/jobs[/:id]",
            "feature_requests": "/api/feature-requests[/:id][/vote]",
        }
    }))
}

/// GET /health - database ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "status": "degraded",
                    "timestamp": now,
                    "details": e.to_string()
                })),
            )
        }
    }
}
