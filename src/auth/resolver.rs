use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::identity::{Identity, IdentitySource, Resolution};
use super::provider::IdentityProvider;
use super::{hash_session_token, AuthError, Credentials};
use crate::database::models::SessionState;
use crate::database::{SessionStore, UserStore};

/// Single identity-resolution path shared by every API route.
///
/// Order: session cookie, bearer token, client-supplied user id. The first
/// method that yields an existing user wins. Resolution never creates or
/// mutates a session.
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    provider: Arc<dyn IdentityProvider>,
    allow_header_identity: bool,
}

impl IdentityResolver {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        provider: Arc<dyn IdentityProvider>,
        allow_header_identity: bool,
    ) -> Self {
        Self {
            users,
            sessions,
            provider,
            allow_header_identity,
        }
    }

    pub async fn resolve(&self, credentials: &Credentials) -> Result<Resolution, AuthError> {
        let mut session_lapsed = false;

        if let Some(token) = credentials.session_token.as_deref() {
            match self.from_session(token).await? {
                Some(identity) => return Ok(identity_resolution(identity)),
                None => session_lapsed = true,
            }
        }

        if let Some(token) = credentials.bearer_token.as_deref() {
            if let Some(identity) = self.from_bearer(token).await? {
                return Ok(identity_resolution(identity));
            }
        }

        if let Some(raw) = credentials.fallback_user_id() {
            if let Some(identity) = self.resolve_user_id(raw).await? {
                return Ok(identity_resolution(identity));
            }
        }

        if session_lapsed {
            tracing::debug!("Session cookie presented but no identity resolved");
            Ok(Resolution::SessionExpired)
        } else {
            Ok(Resolution::Anonymous)
        }
    }

    /// Last-resort lookup of a client-supplied user id. Handlers call this
    /// directly for a `user_id` carried in the request body.
    pub async fn resolve_user_id(&self, raw: &str) -> Result<Option<Identity>, AuthError> {
        if !self.allow_header_identity {
            return Ok(None);
        }
        self.from_user_id(raw).await
    }

    async fn from_session(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        let Some(session) = self.sessions.find_session(&hash_session_token(token)).await? else {
            return Ok(None);
        };
        if session.state_at(Utc::now()) != SessionState::Active {
            return Ok(None);
        }
        self.load(session.user_id, IdentitySource::Session).await
    }

    async fn from_bearer(&self, token: &str) -> Result<Option<Identity>, AuthError> {
        match self.provider.verify_token(token).await? {
            Some(user_id) => self.load(user_id, IdentitySource::Bearer).await,
            None => Ok(None),
        }
    }

    async fn from_user_id(&self, raw: &str) -> Result<Option<Identity>, AuthError> {
        let Ok(user_id) = Uuid::parse_str(raw) else {
            tracing::debug!("Ignoring malformed user id fallback '{}'", raw);
            return Ok(None);
        };
        self.load(user_id, IdentitySource::Header).await
    }

    async fn load(&self, user_id: Uuid, source: IdentitySource) -> Result<Option<Identity>, AuthError> {
        let user = self.users.find_user(user_id).await?;
        Ok(user.map(|user| Identity::from_user(user, source)))
    }
}

fn identity_resolution(identity: Identity) -> Resolution {
    tracing::debug!(user_id = %identity.id, source = ?identity.source, "Identity resolved");
    Resolution::Authenticated(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::{Claims, JwtIdentityProvider};
    use crate::database::MemoryStore;
    use crate::types::Role;
    use chrono::Duration;

    const SECRET: &str = "resolver-test-secret";

    fn resolver(store: &Arc<MemoryStore>, allow_header_identity: bool) -> IdentityResolver {
        IdentityResolver::new(
            store.clone(),
            store.clone(),
            Arc::new(JwtIdentityProvider::new(SECRET)),
            allow_header_identity,
        )
    }

    fn bearer_for(user_id: Uuid) -> String {
        JwtIdentityProvider::new(SECRET).issue(&Claims::new(user_id, None, 1)).unwrap()
    }

    #[tokio::test]
    async fn session_beats_header() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice@example.com", Role::EventManager).await;
        let bob = store.insert_user("bob@example.com", Role::Contractor).await;
        store.insert_session(alice.id, "alice-cookie", Duration::hours(1)).await;

        let creds = Credentials {
            session_token: Some("alice-cookie".into()),
            header_user_id: Some(bob.id.to_string()),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        let identity = resolution.identity().unwrap();
        assert_eq!(identity.id, alice.id);
        assert_eq!(identity.source, IdentitySource::Session);
    }

    #[tokio::test]
    async fn bearer_used_when_no_session() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice@example.com", Role::Admin).await;
        let creds = Credentials {
            bearer_token: Some(bearer_for(alice.id)),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        assert_eq!(resolution.identity().unwrap().source, IdentitySource::Bearer);
    }

    #[tokio::test]
    async fn unknown_header_user_is_anonymous() {
        let store = Arc::new(MemoryStore::new());
        let creds = Credentials {
            header_user_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        assert!(matches!(resolution, Resolution::Anonymous));

        let creds = Credentials {
            header_user_id: Some("not-a-uuid".into()),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        assert!(matches!(resolution, Resolution::Anonymous));
    }

    #[tokio::test]
    async fn header_fallback_marks_source() {
        let store = Arc::new(MemoryStore::new());
        let bob = store.insert_user("bob@example.com", Role::Contractor).await;
        let creds = Credentials {
            header_user_id: Some(bob.id.to_string()),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        assert!(resolution.identity().unwrap().is_header_resolved());

        let resolution = resolver(&store, false).resolve(&creds).await.unwrap();
        assert!(matches!(resolution, Resolution::Anonymous));
    }

    #[tokio::test]
    async fn expired_cookie_signals_session_expired() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice@example.com", Role::EventManager).await;
        store.insert_session(alice.id, "stale", Duration::hours(-1)).await;

        let creds = Credentials {
            session_token: Some("stale".into()),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        assert!(matches!(resolution, Resolution::SessionExpired));
    }

    #[tokio::test]
    async fn expired_cookie_still_falls_back_to_bearer() {
        let store = Arc::new(MemoryStore::new());
        let alice = store.insert_user("alice@example.com", Role::EventManager).await;
        store.insert_session(alice.id, "stale", Duration::hours(-1)).await;

        let creds = Credentials {
            session_token: Some("stale".into()),
            bearer_token: Some(bearer_for(alice.id)),
            ..Default::default()
        };
        let resolution = resolver(&store, true).resolve(&creds).await.unwrap();
        assert_eq!(resolution.identity().unwrap().source, IdentitySource::Bearer);
    }
}
