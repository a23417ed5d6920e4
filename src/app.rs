use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{credentials::USER_ID_HEADER, IdentityResolver, JwtIdentityProvider};
use crate::config::AppConfig;
use crate::database::{
    EventStore, FeatureRequestStore, HealthStore, JobStore, MemoryStore, PgStore, SessionStore, TaskStore,
    TeamStore, UserStore, VoteStore,
};
use crate::handlers::{protected, public};
use crate::middleware::resolve_identity_middleware;
use crate::services::AccessService;
use crate::storage::{SignError, UrlSigner};

/// Everything a handler may depend on. Built once at startup and cloned per
/// request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub resolver: Arc<IdentityResolver>,
    pub access: Arc<AccessService>,
    pub signer: Arc<UrlSigner>,
    pub health: Arc<dyn HealthStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub events: Arc<dyn EventStore>,
    pub team: Arc<dyn TeamStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub jobs: Arc<dyn JobStore>,
    pub feature_requests: Arc<dyn FeatureRequestStore>,
    pub votes: Arc<dyn VoteStore>,
}

impl AppState {
    pub fn postgres(config: AppConfig, pool: PgPool) -> Result<Self, SignError> {
        Self::with_store(config, Arc::new(PgStore::new(pool)))
    }

    pub fn in_memory(config: AppConfig, store: Arc<MemoryStore>) -> Result<Self, SignError> {
        Self::with_store(config, store)
    }

    fn with_store<S>(config: AppConfig, store: Arc<S>) -> Result<Self, SignError>
    where
        S: HealthStore
            + UserStore
            + SessionStore
            + EventStore
            + TeamStore
            + TaskStore
            + JobStore
            + FeatureRequestStore
            + VoteStore
            + 'static,
    {
        let provider = Arc::new(JwtIdentityProvider::new(config.security.jwt_secret.clone()));
        let resolver = IdentityResolver::new(
            store.clone(),
            store.clone(),
            provider,
            config.security.allow_header_identity,
        );
        let access = AccessService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            config.security.conceal_forbidden,
        );
        let signer = UrlSigner::new(&config.storage)?;

        Ok(Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            access: Arc::new(access),
            signer: Arc::new(signer),
            health: store.clone(),
            sessions: store.clone(),
            events: store.clone(),
            team: store.clone(),
            tasks: store.clone(),
            jobs: store.clone(),
            feature_requests: store.clone(),
            votes: store,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_routes())
        .merge(event_routes())
        .merge(team_member_routes())
        .merge(task_routes())
        .merge(job_routes())
        .merge(feature_request_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), resolve_identity_middleware));

    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(api)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(cors_layer(&state.config));

    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .allow_credentials(true)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::delete;
    use protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/auth/session", delete(auth::logout))
}

fn event_routes() -> Router<AppState> {
    use protected::{events, team_members, tasks};

    Router::new()
        .route("/api/events", get(events::list).post(events::create))
        .route(
            "/api/events/:id",
            get(events::show).put(events::update).delete(events::remove),
        )
        .route(
            "/api/events/:id/team-members",
            get(team_members::list_for_event).post(team_members::attach),
        )
        .route(
            "/api/events/:id/team-members/:team_member_id",
            axum::routing::delete(team_members::detach),
        )
        .route("/api/events/:id/tasks", get(tasks::list).post(tasks::create))
}

fn team_member_routes() -> Router<AppState> {
    use protected::team_members;

    Router::new()
        .route("/api/team-members", get(team_members::list).post(team_members::create))
        .route("/api/team-members/:id", axum::routing::delete(team_members::remove))
}

fn task_routes() -> Router<AppState> {
    use protected::tasks;

    Router::new()
        .route("/api/tasks/:id", get(tasks::show).put(tasks::update).delete(tasks::remove))
        .route("/api/tasks/:id/attachments/:file_name", get(tasks::attachment_url))
}

fn job_routes() -> Router<AppState> {
    use protected::jobs;

    Router::new()
        .route("/api/jobs", get(jobs::list).post(jobs::create))
        .route("/api/jobs/:id", get(jobs::show).put(jobs::update).delete(jobs::remove))
}

fn feature_request_routes() -> Router<AppState> {
    use protected::{feature_requests, votes};

    Router::new()
        .route(
            "/api/feature-requests",
            get(feature_requests::list).post(feature_requests::create),
        )
        .route(
            "/api/feature-requests/:id",
            get(feature_requests::show)
                .put(feature_requests::update)
                .delete(feature_requests::remove),
        )
        .route("/api/feature-requests/:id/vote", get(votes::summary).post(votes::cast))
}
