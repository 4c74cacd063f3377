/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with
/// all routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /api/
///     ├── /auth/                     # Public
///     │   ├── POST /signup
///     │   └── POST /login
///     ├── /gigs/                     # JWT required
///     │   ├── POST /                 # Create gig (CREATOR)
///     │   ├── GET  /                 # List open gigs (CLIPPER)
///     │   └── GET  /creator          # List own gigs (CREATOR)
///     ├── /applications/             # JWT required
///     │   ├── GET   /my              # Own applications (CLIPPER)
///     │   ├── GET   /check/:id       # Applied to gig? (CLIPPER)
///     │   ├── GET   /gig/:id         # Applications to a gig (CREATOR)
///     │   ├── POST  /:id             # Apply to gig (CLIPPER)
///     │   ├── GET   /:id             # Application detail (CLIPPER)
///     │   ├── PATCH /:id             # Update status (CREATOR)
///     │   └── POST  /:id/submit      # Submit video (CLIPPER)
///     └── /uploads/                  # JWT required
///         ├── POST   /image
///         ├── POST   /video
///         └── DELETE /:public_id
/// ```
///
/// Token validation happens in a router layer; role checks happen in the
/// handlers (several paths serve different roles per method).

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use clipconnect_shared::{
    auth::{
        jwt,
        middleware::{AuthContext, AuthError},
    },
    media::{CloudinaryClient, MAX_UPLOAD_BYTES},
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into each request handler via axum's `State` extractor; cheap to
/// clone since the config and media client are behind Arcs.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Cloudinary client (None when credentials are not configured)
    pub media: Option<Arc<CloudinaryClient>>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let media = config
            .cloudinary
            .clone()
            .map(|c| Arc::new(CloudinaryClient::new(c)));

        Self {
            db,
            config: Arc::new(config),
            media,
        }
    }

    /// JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Media client, or an error where uploads are attempted unconfigured
    pub fn media_client(&self) -> Result<&CloudinaryClient, ApiError> {
        self.media
            .as_deref()
            .ok_or_else(|| ApiError::InternalError("Media storage is not configured".to_string()))
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    // Gig routes (require JWT; role checks in handlers)
    let gig_routes = Router::new()
        .route(
            "/",
            post(routes::gigs::create_gig).get(routes::gigs::list_open_gigs),
        )
        .route("/creator", get(routes::gigs::list_creator_gigs));

    // Application routes (require JWT; role checks in handlers)
    let application_routes = Router::new()
        .route("/my", get(routes::applications::list_my_applications))
        .route("/check/:id", get(routes::applications::check_application))
        .route("/gig/:id", get(routes::applications::list_gig_applications))
        .route(
            "/:id",
            post(routes::applications::apply_to_gig)
                .get(routes::applications::application_detail)
                .patch(routes::applications::update_application_status),
        )
        .route("/:id/submit", post(routes::applications::submit_video));

    // Upload routes (require JWT; raised body limit for video payloads)
    let upload_routes = Router::new()
        .route("/image", post(routes::uploads::upload_image))
        .route("/video", post(routes::uploads::upload_video))
        .route("/:public_id", delete(routes::uploads::delete_file))
        // Cap multipart bodies a little above the media limit so the
        // media layer produces the 400, not a generic 413
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024));

    let protected_api = Router::new()
        .nest("/gigs", gig_routes)
        .nest("/applications", application_routes)
        .nest("/uploads", upload_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new().nest("/auth", auth_routes).merge(protected_api);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
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
        .layer(SecurityHeadersLayer::new())
        .with_state(state)
}

/// Bearer-token authentication layer
///
/// Validates the JWT from the Authorization header and injects an
/// [`AuthContext`] into the request extensions for downstream handlers.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidFormat)?;

    let claims =
        jwt::validate_token(token, state.jwt_secret()).map_err(|_| AuthError::InvalidToken)?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
