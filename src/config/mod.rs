use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub session_cookie: String,
    /// Accept the `x-user-id` header (and `user_id` body field) as a last-resort identity.
    pub allow_header_identity: bool,
    /// Answer 404 instead of 403 when a caller may not read an existing resource.
    pub conceal_forbidden: bool,
    pub cors_origins: Vec<String>,
    pub token_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// HMAC key for download links. Kept apart from `jwt_secret` so a link token never verifies as a bearer.
    #[serde(skip_serializing)]
    pub signing_secret: String,
    pub base_url: String,
    pub bucket: String,
    pub signed_url_ttl_secs: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set outside development")]
    MissingJwtSecret,
    #[error("STORAGE_SIGNING_SECRET must be set outside development")]
    MissingSigningSecret,
    #[error("STORAGE_SIGNING_SECRET must differ from JWT_SECRET")]
    SharedSigningSecret,
    #[error("Invalid storage base URL: {0}")]
    InvalidStorageUrl(String),
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("EVENTHUB_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("SECURITY_ALLOW_HEADER_IDENTITY") {
            self.security.allow_header_identity = v.parse().unwrap_or(self.security.allow_header_identity);
        }
        if let Ok(v) = env::var("SECURITY_CONCEAL_FORBIDDEN") {
            self.security.conceal_forbidden = v.parse().unwrap_or(self.security.conceal_forbidden);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_EXPIRY_HOURS") {
            self.security.token_expiry_hours = v.parse().unwrap_or(self.security.token_expiry_hours);
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_SIGNING_SECRET") {
            self.storage.signing_secret = v;
        }
        if let Ok(v) = env::var("STORAGE_BASE_URL") {
            self.storage.base_url = v;
        }
        if let Ok(v) = env::var("STORAGE_BUCKET") {
            self.storage.bucket = v;
        }
        if let Ok(v) = env::var("STORAGE_SIGNED_URL_TTL_SECS") {
            self.storage.signed_url_ttl_secs = v.parse().unwrap_or(self.storage.signed_url_ttl_secs);
        }

        self
    }

    /// Reject configurations the server cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() && self.environment != Environment::Development {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.storage.signing_secret.is_empty() && self.environment != Environment::Development {
            return Err(ConfigError::MissingSigningSecret);
        }
        if !self.storage.signing_secret.is_empty() && self.storage.signing_secret == self.security.jwt_secret {
            return Err(ConfigError::SharedSigningSecret);
        }
        url::Url::parse(&self.storage.base_url)
            .map_err(|_| ConfigError::InvalidStorageUrl(self.storage.base_url.clone()))?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                jwt_secret: "eventhub-development-secret".to_string(),
                session_cookie: "eh_session".to_string(),
                allow_header_identity: true,
                conceal_forbidden: false,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                token_expiry_hours: 24 * 7, // 1 week
            },
            storage: StorageConfig {
                signing_secret: "eventhub-development-storage-secret".to_string(),
                base_url: "http://localhost:54321/storage/v1".to_string(),
                bucket: "attachments".to_string(),
                signed_url_ttl_secs: 3600,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_cookie: "eh_session".to_string(),
                allow_header_identity: true,
                conceal_forbidden: false,
                cors_origins: vec!["https://staging.example.com".to_string()],
                token_expiry_hours: 24,
            },
            storage: StorageConfig {
                signing_secret: String::new(),
                base_url: "https://storage.staging.example.com/storage/v1".to_string(),
                bucket: "attachments".to_string(),
                signed_url_ttl_secs: 3600,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_cookie: "eh_session".to_string(),
                allow_header_identity: true,
                conceal_forbidden: false,
                cors_origins: vec!["https://app.example.com".to_string()],
                token_expiry_hours: 4,
            },
            storage: StorageConfig {
                signing_secret: String::new(),
                base_url: "https://storage.example.com/storage/v1".to_string(),
                bucket: "attachments".to_string(),
                signed_url_ttl_secs: 900,
            },
        }
    }
}
