//! Request-scoped identity.
//!
//! The authentication gate resolves every request to exactly one [`Identity`]
//! value before any route logic runs. Downstream code pattern-matches on it
//! instead of null-checking an optional user.

use chrono::{Duration, Utc};

use crate::auth::roles::Role;
use crate::auth::token::Claims;

/// Subject attached to requests that demo mode waves through.
pub const DEMO_SUBJECT: &str = "demo-admin";
const DEMO_EMAIL: &str = "demo-admin@escola.local";

/// Caller identity established by the authentication gate.
///
/// `Anonymous` means no usable credentials were presented; it is distinct
/// from any placeholder "guest" claim. Enforcement is a downstream concern.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Authenticated(Claims),
}

impl Identity {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Identity::Authenticated(claims) => Some(claims),
            Identity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// Synthetic Admin identity used when demo mode stands in for real
/// authentication. Never serialized into a signed token.
pub fn synthetic_demo_admin(ttl: Duration) -> Claims {
    let now = Utc::now();
    Claims {
        sub: DEMO_SUBJECT.to_string(),
        email: DEMO_EMAIL.to_string(),
        role: Role::Admin,
        tenant_id: None,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    }
}
