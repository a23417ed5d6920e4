use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
};
use serde_json::json;

use crate::app::AppState;
use crate::auth::hash_session_token;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, RequestIdentity};

/// GET /api/auth/whoami - the identity resolved for this request
///
/// ```json
/// { "success": true, "user": { "id": "…", "email": "…", "role": "event_manager", "source": "session" } }
/// ```
pub async fn whoami(AuthUser(identity): AuthUser) -> ApiResult<serde_json::Value> {
    Ok(ApiResponse::success(json!({ "user": identity })))
}

/// DELETE /api/auth/session - revoke the session behind the cookie
pub async fn logout(
    State(state): State<AppState>,
    request_identity: RequestIdentity,
) -> Result<impl IntoResponse, ApiError> {
    let token = request_identity
        .credentials
        .session_token
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("No session cookie present"))?;

    let revoked = state.sessions.revoke_session(&hash_session_token(token)).await?;
    if revoked {
        tracing::info!(user_id = ?request_identity.identity().map(|i| i.id), "Session revoked");
    }

    let cookie = format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        state.config.security.session_cookie
    );
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }

    Ok((headers, ApiResponse::success(json!({ "revoked": revoked }))))
}
