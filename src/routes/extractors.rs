// ============================================================================
// Axum Extractors
// ============================================================================
//
// Custom extractors for Axum routes:
// - CurrentIdentity: the identity resolved by the authentication gate
//
// ============================================================================

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::auth::identity::Identity;

/// Extractor for the identity the authentication gate attached.
///
/// Infallible: a request the gate never saw extracts as `Anonymous`.
///
/// Usage:
/// ```rust,ignore
/// async fn handler(CurrentIdentity(identity): CurrentIdentity) -> ... {
///     match identity {
///         Identity::Authenticated(claims) => ...,
///         Identity::Anonymous => ...,
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<Identity>()
                .cloned()
                .unwrap_or(Identity::Anonymous),
        ))
    }
}
