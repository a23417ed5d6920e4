use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: Option<String>, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id.to_string(),
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Exchanges a bearer token for a user id.
///
/// `Ok(None)` means the token was rejected; errors are reserved for the
/// provider itself being unusable.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<Option<Uuid>, AuthError>;
}

/// HS256 access tokens signed with the configured secret
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Option<Uuid>, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::InvalidSecret);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        match decode::<Claims>(token, &decoding_key, &Validation::default()) {
            Ok(data) => Ok(Uuid::parse_str(&data.claims.sub).ok()),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_token_verifies() {
        let provider = JwtIdentityProvider::new("test-secret");
        let user_id = Uuid::new_v4();
        let token = provider.issue(&Claims::new(user_id, None, 1)).unwrap();
        assert_eq!(provider.verify_token(&token).await.unwrap(), Some(user_id));
    }

    #[tokio::test]
    async fn rejects_foreign_and_expired_tokens() {
        let provider = JwtIdentityProvider::new("test-secret");
        let other = JwtIdentityProvider::new("other-secret");
        let user_id = Uuid::new_v4();

        let foreign = other.issue(&Claims::new(user_id, None, 1)).unwrap();
        assert_eq!(provider.verify_token(&foreign).await.unwrap(), None);

        let mut claims = Claims::new(user_id, None, 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let expired = provider.issue(&claims).unwrap();
        assert_eq!(provider.verify_token(&expired).await.unwrap(), None);

        assert_eq!(provider.verify_token("garbage").await.unwrap(), None);
    }

    #[test]
    fn refuses_empty_secret() {
        let provider = JwtIdentityProvider::new("");
        assert!(matches!(
            provider.issue(&Claims::new(Uuid::new_v4(), None, 1)),
            Err(AuthError::InvalidSecret)
        ));
    }
}
