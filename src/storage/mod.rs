//! Time-limited download links for private storage objects.
//!
//! Links have the shape `<base>/object/sign/<bucket>/<path>?token=<jwt>`, where
//! the token is an HS256 JWT carrying the object key and an expiry. Permanent
//! public URLs are never handed out.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid storage base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("storage base URL cannot carry a path")]
    OpaqueBaseUrl,
    #[error("object path must not be empty or contain '..'")]
    InvalidPath,
    #[error("signing key is empty")]
    MissingSecret,
    #[error("token rejected: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("token was issued for a different object")]
    PathMismatch,
}

#[derive(Debug, Serialize, Deserialize)]
struct ObjectClaims {
    url: String,
    exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignedUrl {
    #[serde(rename = "signedUrl")]
    pub url: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct UrlSigner {
    base_url: Url,
    bucket: String,
    secret: String,
    ttl_secs: u64,
}

impl UrlSigner {
    pub fn new(config: &StorageConfig) -> Result<Self, SignError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SignError::OpaqueBaseUrl);
        }
        Ok(Self {
            base_url,
            bucket: config.bucket.clone(),
            secret: config.signing_secret.clone(),
            ttl_secs: config.signed_url_ttl_secs,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Sign an object in the configured bucket
    pub fn sign(&self, path: &str) -> Result<SignedUrl, SignError> {
        self.sign_in(&self.bucket, path)
    }

    pub fn sign_in(&self, bucket: &str, path: &str) -> Result<SignedUrl, SignError> {
        if self.secret.is_empty() {
            return Err(SignError::MissingSecret);
        }
        let segments = object_segments(bucket, path)?;

        let expires_at = Utc::now().timestamp() + self.ttl_secs as i64;
        let claims = ObjectClaims {
            url: segments.join("/"),
            exp: expires_at,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SignError::OpaqueBaseUrl)?
            .pop_if_empty()
            .extend(["object", "sign"])
            .extend(segments.iter().map(String::as_str));
        url.query_pairs_mut().append_pair("token", &token);

        Ok(SignedUrl {
            url: url.to_string(),
            expires_at,
        })
    }

    /// Check a token against the object it is presented for
    pub fn verify(&self, bucket: &str, path: &str, token: &str) -> Result<(), SignError> {
        let expected = object_segments(bucket, path)?.join("/");
        let data = decode::<ObjectClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;
        if data.claims.url != expected {
            return Err(SignError::PathMismatch);
        }
        Ok(())
    }
}

fn object_segments(bucket: &str, path: &str) -> Result<Vec<String>, SignError> {
    let mut segments = vec![bucket.trim_matches('/').to_string()];
    segments.extend(path.split('/').filter(|s| !s.is_empty()).map(str::to_string));

    if segments.len() < 2 || segments.iter().any(|s| s.is_empty() || s == "..") {
        return Err(SignError::InvalidPath);
    }
    Ok(segments)
}
