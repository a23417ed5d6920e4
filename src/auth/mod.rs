pub mod credentials;
pub mod identity;
pub mod provider;
pub mod resolver;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::database::DatabaseError;

pub use credentials::Credentials;
pub use identity::{Identity, IdentitySource, Resolution};
pub use provider::{Claims, IdentityProvider, JwtIdentityProvider};
pub use resolver::IdentityResolver;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

/// Session cookies are stored by digest only
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
