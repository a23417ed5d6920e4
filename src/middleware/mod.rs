pub mod identity;
pub mod json;
pub mod response;

pub use identity::{resolve_identity_middleware, AuthUser, MaybeIdentity, RequestIdentity};
pub use json::JsonBody;
pub use response::{ApiResponse, ApiResult};
