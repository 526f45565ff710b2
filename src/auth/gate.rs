//! Authentication gate.
//!
//! Runs once per request, after the rate governor and before any route
//! logic. Its only job is to *resolve* the caller's identity; it never
//! rejects a request. Routes that need an identity enforce it through the
//! authorization guard.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Duration;
use std::sync::Arc;

use crate::auth::identity::{synthetic_demo_admin, Identity};
use crate::context::AppContext;

/// Middleware attaching an [`Identity`] to every request.
pub async fn authenticate(
    State(ctx): State<Arc<AppContext>>,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = resolve_identity(&ctx, bearer_token(req.headers()));
    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Resolve an identity from an optional bearer token.
///
/// Demo mode never leaves a request anonymous: a missing or invalid token
/// falls back to the synthetic demo admin. Outside demo mode the same cases
/// resolve to `Anonymous` — a failed token is indistinguishable from no
/// token by the time a route sees the request.
pub(crate) fn resolve_identity(ctx: &AppContext, token: Option<&str>) -> Identity {
    let demo_fallback = || {
        Identity::Authenticated(synthetic_demo_admin(Duration::days(
            ctx.config.token_ttl_days,
        )))
    };

    match token {
        Some(token) => match ctx.tokens.verify(token) {
            Ok(claims) => Identity::Authenticated(claims),
            Err(_) if ctx.config.demo_mode => {
                tracing::debug!("Token rejected; demo mode substitutes synthetic admin");
                demo_fallback()
            }
            Err(_) => Identity::Anonymous,
        },
        None if ctx.config.demo_mode => demo_fallback(),
        None => Identity::Anonymous,
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use crate::test_support;

    #[test]
    fn valid_token_resolves_to_its_claims() {
        let ctx = test_support::context(false);
        let (token, _) = ctx
            .tokens
            .issue("user-7", "prof.silva@escola.com", Role::Teacher, None)
            .unwrap();

        let identity = resolve_identity(&ctx, Some(&token));
        let claims = identity.claims().expect("should be authenticated");
        assert_eq!(claims.sub, "user-7");
        assert_eq!(claims.role, Role::Teacher);
    }

    #[test]
    fn missing_token_is_anonymous_outside_demo_mode() {
        let ctx = test_support::context(false);
        assert!(!resolve_identity(&ctx, None).is_authenticated());
    }

    #[test]
    fn invalid_token_is_anonymous_outside_demo_mode() {
        let ctx = test_support::context(false);
        assert!(!resolve_identity(&ctx, Some("garbage")).is_authenticated());
    }

    #[test]
    fn demo_mode_substitutes_admin_for_missing_token() {
        let ctx = test_support::context(true);
        let identity = resolve_identity(&ctx, None);
        let claims = identity.claims().expect("demo mode never leaves anonymous");
        assert_eq!(claims.sub, "demo-admin");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn demo_mode_substitutes_admin_for_invalid_token() {
        let ctx = test_support::context(true);
        let identity = resolve_identity(&ctx, Some("garbage"));
        assert_eq!(identity.claims().map(|c| c.role), Some(Role::Admin));
    }

    #[test]
    fn demo_mode_still_honors_a_valid_token() {
        let ctx = test_support::context(true);
        let (token, _) = ctx
            .tokens
            .issue("user-9", "aluno@escola.com", Role::Student, None)
            .unwrap();

        let identity = resolve_identity(&ctx, Some(&token));
        assert_eq!(identity.claims().map(|c| c.role), Some(Role::Student));
    }

    #[test]
    fn bearer_prefix_is_required() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Token abc".parse().unwrap());
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc"));
    }
}
