//! Rate-governor middleware.
//!
//! Sits in front of every gated route. Each route class gets its own
//! [`RateLimiter`] (policy + shared store); the informational headers are
//! set on every evaluated response, pass or reject.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::error::AppError;
use crate::utils::client_key;

use super::policy::RateLimitPolicy;
use super::store::{RateDecision, RateLimitStore};

/// One policy bound to the shared counter store.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<RateLimitStore>,
    policy: Arc<RateLimitPolicy>,
    /// Demo mode disables the governor entirely; not a security boundary.
    demo_mode: bool,
}

impl RateLimiter {
    pub fn new(store: Arc<RateLimitStore>, policy: RateLimitPolicy, demo_mode: bool) -> Self {
        Self {
            store,
            policy: Arc::new(policy),
            demo_mode,
        }
    }
}

/// Middleware evaluating one request against the limiter's policy.
pub async fn govern(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Response {
    if limiter.demo_mode {
        return next.run(req).await;
    }

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client = client_key(req.headers(), peer);
    let key = format!("{}:{}", limiter.policy.name, client);

    let decision = limiter.store.check(&key, &limiter.policy, Utc::now()).await;

    if !decision.allowed {
        tracing::warn!(
            client = %client,
            policy = limiter.policy.name,
            retry_after_secs = decision.retry_after_secs,
            "Rate limit exceeded"
        );
        let mut response =
            AppError::RateLimitExceeded(limiter.policy.message.clone()).into_response();
        apply_headers(response.headers_mut(), &decision);
        if let Ok(value) = HeaderValue::from_str(&decision.retry_after_secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
        return response;
    }

    let mut response = next.run(req).await;

    if limiter.policy.skip_successful_requests
        && !response.status().is_client_error()
        && !response.status().is_server_error()
    {
        limiter.store.rollback(&key).await;
    }

    apply_headers(response.headers_mut(), &decision);
    response
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    if let Ok(value) = HeaderValue::from_str(&decision.limit.to_string()) {
        headers.insert("x-ratelimit-limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", value);
    }
    let reset = decision.reset_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert("x-ratelimit-reset", value);
    }
}
