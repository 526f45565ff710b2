//! Role-based authorization guard.
//!
//! Routes that need a role wrap themselves in [`require`], parameterized
//! with the role they demand. The decision itself lives in [`authorize`] so
//! it can be tested as a total function.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Duration;
use std::sync::Arc;

use crate::auth::identity::{synthetic_demo_admin, Identity};
use crate::auth::roles::Role;
use crate::auth::token::Claims;
use crate::context::AppContext;
use crate::error::AppError;

/// Admin satisfies every role check; any other role only its own.
fn role_allows(held: Role, required: Role) -> bool {
    held == required || held == Role::Admin
}

/// Decide whether `identity` may pass a check requiring `required`.
///
/// Demo mode synthesizes an Admin for anonymous callers — the same fallback
/// the authentication gate applies, repeated here as a second safety net.
/// Otherwise anonymous callers are rejected as UNAUTHORIZED and
/// wrong-role callers as FORBIDDEN.
pub fn authorize(
    identity: &Identity,
    required: Role,
    demo_mode: bool,
    ttl_days: i64,
) -> Result<Claims, AppError> {
    match identity {
        Identity::Authenticated(claims) => {
            if role_allows(claims.role, required) {
                Ok(claims.clone())
            } else {
                Err(AppError::Forbidden(required.to_string()))
            }
        }
        Identity::Anonymous if demo_mode => {
            Ok(synthetic_demo_admin(Duration::days(ttl_days)))
        }
        Identity::Anonymous => Err(AppError::Unauthorized),
    }
}

/// Route-scoped middleware enforcing a required role.
///
/// Attach with
/// `middleware::from_fn_with_state((ctx, Role::Teacher), guard::require)`.
pub async fn require(
    State((ctx, required)): State<(Arc<AppContext>, Role)>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or(Identity::Anonymous);

    let claims = authorize(
        &identity,
        required,
        ctx.config.demo_mode,
        ctx.config.token_ttl_days,
    )?;

    // Handlers see the identity that actually passed the check, including a
    // demo-mode synthesized admin.
    req.extensions_mut().insert(Identity::Authenticated(claims));
    Ok(next.run(req).await)
}
