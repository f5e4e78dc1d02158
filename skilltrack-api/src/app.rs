/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use skilltrack_api::{app::AppState, config::Config};
/// use skilltrack_shared::auth::tokens::InMemoryTokenStore;
/// use skilltrack_shared::notify::LogMailer;
/// use sqlx::PgPool;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database_url).await?;
/// let state = AppState::new(
///     pool,
///     config,
///     Arc::new(InMemoryTokenStore::new()),
///     Arc::new(LogMailer),
/// );
/// let app = skilltrack_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use skilltrack_shared::auth::{
    jwt,
    middleware::{extract_bearer_token, AuthContext},
    tokens::TokenStore,
};
use skilltrack_shared::notify::Mailer;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Maximum accepted request body, sized for file uploads (20 MiB)
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Refresh-token revocation store
    pub token_store: Arc<dyn TokenStore>,

    /// Mail transport for assignment notifications
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates new application state
    pub fn new(
        db: PgPool,
        config: Config,
        token_store: Arc<dyn TokenStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            token_store,
            mailer,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /employee/                   # Accounts and directory
///     │   ├── POST /register           # (public)
///     │   ├── POST /login              # (public)
///     │   ├── POST /refresh            # (public)
///     │   ├── POST /logout             # (public)
///     │   ├── GET  /                   # list (HR)
///     │   ├── POST /                   # create (HR)
///     │   └── POST /changepsw
///     ├── /company/                    # POST create (admin)
///     ├── /team/                       # GET list, POST create
///     ├── /team_member/                # membership management
///     ├── /competence/                 # competences and assignment
///     ├── /user_task/                  # per-member status rows
///     ├── /file/                       # competence attachments
///     └── /search/fuzzy                # directory search
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Account endpoints that must work without a token
    let public_employee_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/logout", post(routes::auth::logout));

    // Directory endpoints (require JWT authentication)
    let employee_routes = Router::new()
        .route("/", get(routes::employees::list_employees))
        .route("/", post(routes::employees::create_employee))
        .route("/changepsw", post(routes::auth::change_password));

    let company_routes = Router::new().route("/", post(routes::companies::create_company));

    let team_routes = Router::new()
        .route("/", get(routes::teams::list_teams))
        .route("/", post(routes::teams::create_team));

    let membership_routes = Router::new()
        .route("/", get(routes::memberships::list_memberships))
        .route("/", post(routes::memberships::add_member))
        .route(
            "/employee/:employee_id",
            get(routes::memberships::list_for_employee),
        )
        .route("/team/:team_id", get(routes::memberships::list_for_team))
        .route(
            "/:team_id/:employee_id",
            delete(routes::memberships::remove_member),
        );

    let competence_routes = Router::new()
        .route("/", get(routes::competences::list_competences))
        .route("/", post(routes::competences::create_competence))
        .route("/:id", put(routes::competences::update_competence))
        .route("/:id", delete(routes::competences::delete_competence))
        .route(
            "/:id/progress",
            get(routes::competences::competence_progress_handler),
        )
        .route(
            "/employee/:employee_id",
            get(routes::competences::list_for_employee),
        )
        .route("/team/:team_id", get(routes::competences::team_overview));

    let user_task_routes = Router::new()
        .route("/", get(routes::user_tasks::list_tasks))
        .route("/me/:competence_id", put(routes::user_tasks::update_own_task))
        .route(
            "/:competence_id/:employee_id",
            put(routes::user_tasks::update_member_task),
        );

    let file_routes = Router::new()
        .route("/", get(routes::files::list_files))
        .route("/", post(routes::files::upload_file))
        .route("/:id/download", get(routes::files::download_file))
        .route("/:id", delete(routes::files::delete_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    let search_routes = Router::new().route("/fuzzy", get(routes::search::fuzzy_search));

    // Everything except the public account endpoints goes behind JWT auth
    let protected_routes = Router::new()
        .nest("/employee", employee_routes)
        .nest("/company", company_routes)
        .nest("/team", team_routes)
        .nest("/team_member", membership_routes)
        .nest("/competence", competence_routes)
        .nest("/user_task", user_task_routes)
        .nest("/file", file_routes)
        .nest("/search", search_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/employee", public_employee_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.server.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .server
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.server.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the access token from the Authorization
/// header, then injects [`AuthContext`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = extract_bearer_token(req.headers())?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(&claims);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
