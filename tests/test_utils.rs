// Shared helpers for integration tests: build an isolated gateway instance
// on an ephemeral port and drive it over HTTP.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use escola_gateway::auth::credentials::{CredentialStore, DemoCredentialStore};
use escola_gateway::auth::TokenService;
use escola_gateway::config::{Config, RateConfig};
use escola_gateway::context::AppContext;
use escola_gateway::rate_limit::RateLimitStore;
use escola_gateway::routes::create_router;

pub const SIGNING_KEY: &str = "integration-test-signing-key-0123456789";

/// Baseline configuration with ceilings high enough not to interfere;
/// individual tests tighten the policy under test.
pub fn test_config(demo_mode: bool) -> Config {
    Config {
        port: 0,
        production: false,
        jwt_secret: SIGNING_KEY.to_string(),
        token_ttl_days: 7,
        demo_mode,
        allowed_origins: Vec::new(),
        rate: RateConfig {
            general_window_secs: 900,
            general_max: 10_000,
            auth_window_secs: 900,
            auth_max: 10_000,
            api_window_secs: 900,
            api_max: 10_000,
            sweep_interval_secs: 3600,
        },
        log_hash_salt: "test".to_string(),
    }
}

pub struct TestApp {
    pub address: String,
    pub ctx: Arc<AppContext>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }
}

pub fn build_context(config: Config) -> Arc<AppContext> {
    let config = Arc::new(config);
    let tokens = Arc::new(TokenService::new(&config));
    let rate_store = Arc::new(RateLimitStore::new());
    let credentials: Arc<dyn CredentialStore> = Arc::new(DemoCredentialStore::with_fixtures());
    Arc::new(AppContext::new(config, tokens, rate_store, credentials))
}

/// Serve the full application router on an ephemeral local port.
pub async fn spawn_app(config: Config) -> TestApp {
    let ctx = build_context(config);
    let app = create_router(ctx.clone());
    spawn_router(app, ctx).await
}

/// Serve an arbitrary router (tests compose their own guarded routes).
pub async fn spawn_router(app: axum::Router, ctx: Arc<AppContext>) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no local addr");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("test server failed");
    });

    TestApp {
        address: addr.to_string(),
        ctx,
    }
}

/// POST /api/auth/login and return the parsed JSON body.
pub async fn login(
    client: &reqwest::Client,
    app: &TestApp,
    email: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed")
}

pub async fn login_token(
    client: &reqwest::Client,
    app: &TestApp,
    email: &str,
    password: &str,
) -> String {
    let response = login(client, app, email, password).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("login body not JSON");
    body["token"]
        .as_str()
        .expect("login response missing token")
        .to_string()
}
