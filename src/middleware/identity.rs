use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::{Credentials, Identity, IdentityResolver, Resolution};
use crate::error::ApiError;

/// Identity resolution result attached to every request by
/// [`resolve_identity_middleware`]
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub resolution: Resolution,
    pub credentials: Credentials,
}

impl RequestIdentity {
    fn anonymous() -> Self {
        Self {
            resolution: Resolution::Anonymous,
            credentials: Credentials::default(),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.resolution.identity()
    }

    /// Require an identity, falling back to a `user_id` from the request body
    /// when the headers did not resolve one.
    pub async fn require(
        &self,
        resolver: &IdentityResolver,
        body_user_id: Option<&str>,
    ) -> Result<Identity, ApiError> {
        if let Some(identity) = self.resolution.identity() {
            return Ok(identity.clone());
        }
        if let Some(raw) = body_user_id.filter(|raw| !raw.trim().is_empty()) {
            if let Some(identity) = resolver.resolve_user_id(raw.trim()).await? {
                return Ok(identity);
            }
        }
        Err(rejection(&self.resolution))
    }
}

fn rejection(resolution: &Resolution) -> ApiError {
    match resolution {
        Resolution::SessionExpired => ApiError::session_expired("Session expired, please sign in again"),
        _ => ApiError::unauthorized("Authentication required"),
    }
}

/// Resolve the caller once per request and stash the outcome in extensions
pub async fn resolve_identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let credentials = Credentials::from_headers(request.headers(), &state.config.security.session_cookie);

    let resolution = match state.resolver.resolve(&credentials).await {
        Ok(resolution) => resolution,
        Err(e) => return ApiError::from(e).into_response(),
    };

    request.extensions_mut().insert(RequestIdentity {
        resolution,
        credentials,
    });

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestIdentity>()
            .cloned()
            .unwrap_or_else(RequestIdentity::anonymous))
    }
}

/// Caller identity if one was resolved; never rejects
#[derive(Debug, Clone)]
pub struct MaybeIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<RequestIdentity>()
            .and_then(|ri| ri.identity().cloned());
        Ok(MaybeIdentity(identity))
    }
}

/// Authenticated caller; rejects with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestIdentity>().map(|ri| &ri.resolution) {
            Some(Resolution::Authenticated(identity)) => Ok(AuthUser(identity.clone())),
            Some(other) => Err(rejection(other)),
            None => Err(rejection(&Resolution::Anonymous)),
        }
    }
}
