// handlers/mod.rs - route handlers by exposure
//
// public:    no identity needed (/, /health)
// protected: /api/* behind the identity-resolution middleware; each handler
//            decides between MaybeIdentity (public reads) and AuthUser

pub mod protected;
pub mod public;
