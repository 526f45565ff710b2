// ============================================================================
// Axum Routes Module
// ============================================================================
//
// Structure:
// - mod.rs: Main router assembly, CORS, policy attachment
// - auth.rs: Login and session introspection endpoints
// - admin.rs: Operator endpoints (Admin role)
// - health.rs: Liveness endpoint
// - extractors.rs: Custom Axum extractors (CurrentIdentity)
// - middleware.rs: Request logging
//
// Every request flows rate governor -> authentication gate -> (per-route)
// authorization guard -> handler.
//
// ============================================================================

mod admin;
mod auth;
mod health;
mod middleware;

pub mod extractors;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{gate, guard, Role};
use crate::config::Config;
use crate::context::AppContext;
use crate::rate_limit::{self, RateLimitPolicy, RateLimiter};

/// Create the main application router with all routes and gateway layers
pub fn create_router(ctx: Arc<AppContext>) -> Router {
    let demo_mode = ctx.config.demo_mode;
    let general_limiter = RateLimiter::new(
        ctx.rate_store.clone(),
        RateLimitPolicy::general(&ctx.config.rate),
        demo_mode,
    );
    let auth_limiter = RateLimiter::new(
        ctx.rate_store.clone(),
        RateLimitPolicy::auth(&ctx.config.rate),
        demo_mode,
    );
    let api_limiter = RateLimiter::new(
        ctx.rate_store.clone(),
        RateLimitPolicy::api(&ctx.config.rate),
        demo_mode,
    );

    // Login carries the narrow auth policy on top of the api/general tiers
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route_layer(axum::middleware::from_fn_with_state(
            auth_limiter,
            rate_limit::govern,
        ))
        .route("/me", get(auth::me));

    let admin_routes = Router::new()
        .route("/rate-limits", get(admin::rate_limits))
        .route_layer(axum::middleware::from_fn_with_state(
            (ctx.clone(), Role::Admin),
            guard::require,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            api_limiter,
            rate_limit::govern,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        // Apply gateway layers (order matters: listed top to bottom,
        // outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_logging))
                .layer(cors_layer(&ctx.config))
                .layer(axum::middleware::from_fn_with_state(
                    general_limiter,
                    rate_limit::govern,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    ctx.clone(),
                    gate::authenticate,
                ))
                .into_inner(),
        )
        .with_state(ctx)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .effective_origins()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
