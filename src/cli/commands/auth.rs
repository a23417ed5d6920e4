use serde_json::json;
use uuid::Uuid;

use crate::auth::{Claims, JwtIdentityProvider};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Mint a bearer token signed with the configured JWT secret
pub fn token(
    config: &AppConfig,
    user: Uuid,
    email: Option<String>,
    hours: Option<u64>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let hours = hours.unwrap_or(config.security.token_expiry_hours);
    let provider = JwtIdentityProvider::new(config.security.jwt_secret.clone());
    let claims = Claims::new(user, email, hours);
    let expires_at = claims.exp;
    let token = provider.issue(&claims)?;

    output_success(
        output_format,
        "Token issued",
        Some(&token),
        json!({ "token": token, "user_id": user, "expires_at": expires_at }),
    )
}
