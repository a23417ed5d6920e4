use axum::http::{header, HeaderMap};

pub const USER_ID_HEADER: &str = "x-user-id";

/// Raw authentication material carried by a request. Nothing here is trusted
/// until the resolver has checked it.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub session_token: Option<String>,
    pub bearer_token: Option<String>,
    pub header_user_id: Option<String>,
    pub body_user_id: Option<String>,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap, session_cookie: &str) -> Self {
        Self {
            session_token: cookie_value(headers, session_cookie),
            bearer_token: bearer_token(headers),
            header_user_id: headers
                .get(USER_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            body_user_id: None,
        }
    }

    /// Attach a `user_id` taken from the request body
    pub fn with_body_user_id(mut self, user_id: Option<String>) -> Self {
        self.body_user_id = user_id;
        self
    }

    /// Client-supplied id, header first
    pub fn fallback_user_id(&self) -> Option<&str> {
        self.header_user_id.as_deref().or(self.body_user_id.as_deref())
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
        .find(|value| !value.is_empty())
}

/// Extract the token from `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}
