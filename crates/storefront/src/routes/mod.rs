//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Home page
//! GET  /about            - About page
//! GET  /services         - Service catalog
//! GET  /pricing          - Pricing table
//! GET  /blog             - Blog index (?tag=)
//! GET  /blog/{slug}      - Blog post
//! GET  /health           - Liveness check
//!
//! # Auth
//! GET  /login            - Login page (?redirect=, ?persona=)
//! POST /login            - Login handshake
//! GET  /register         - Register page
//! POST /register         - Registration handshake
//! POST /logout           - Sign out
//!
//! # Signed in
//! GET  /dashboard        - Role dashboard (redirects to /login when anonymous)
//! ```

pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod layout;
pub mod pages;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/{slug}", get(blog::show))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/pricing", get(pages::pricing))
        .route("/dashboard", get(dashboard::show))
        .route("/health", get(health))
        .nest("/blog", blog_routes())
        .merge(auth_routes())
}

/// Build the full application with middleware.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
