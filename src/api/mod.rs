//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints for the Media Ranker service:
//! - Home page and work CRUD endpoints
//! - Upvote endpoint
//! - Auth endpoints (login/logout/me)

pub mod auth;
pub mod middleware;
pub mod responses;
pub mod works;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser, MaybeUser};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Auth routes that hard-require a user
    let protected_routes = auth::protected_router()
        .route_layer(axum_middleware::from_fn(middleware::require_auth));

    Router::new()
        .route("/", get(works::home))
        .nest("/works", works::router())
        .merge(auth::public_router())
        .merge(protected_routes)
        // Session resolution for every route; handlers decide what a guest means
        .layer(axum_middleware::from_fn_with_state(
            state,
            middleware::optional_auth,
        ))
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    build_api_router(state.clone())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
