//! Signed identity tokens.
//!
//! Wraps `jsonwebtoken` with the claim set the gateway cares about. The
//! verify side is total: any failure collapses to [`InvalidToken`] so
//! downstream code never branches on *why* a token was rejected, while the
//! distinguishing reason is still logged for operability.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::roles::Role;
use crate::config::Config;

/// Identity claims carried by a verified token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Optional tenant for multi-school deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Expiration time (Unix epoch seconds)
    pub exp: i64,
}

/// Uniform verification failure. Malformed, bad-signature and expired
/// tokens all land here; callers must not be able to tell them apart.
#[derive(Debug, Error)]
#[error("invalid token")]
pub struct InvalidToken;

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::days(config.token_ttl_days),
        }
    }

    /// Issue a signed token for the given identity.
    ///
    /// Returns the compact token string and its expiration timestamp.
    pub fn issue(
        &self,
        subject: &str,
        email: &str,
        role: Role,
        tenant_id: Option<String>,
    ) -> Result<(String, i64)> {
        let now = Utc::now();
        let exp = now + self.ttl;

        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_string(),
            role,
            tenant_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .context("Failed to encode identity token")?;

        Ok((token, exp.timestamp()))
    }

    /// Verify a token's signature and expiration.
    ///
    /// Never panics and never surfaces the failure reason to the caller.
    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        let validation = Validation::default();
        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "expired",
                    ErrorKind::InvalidSignature => "signature mismatch",
                    _ => "malformed",
                };
                tracing::debug!(reason = reason, "Token verification failed");
                Err(InvalidToken)
            }
        }
    }
}
