// ============================================================================
// Authentication Routes
// ============================================================================
//
// Endpoints:
// - POST /api/auth/login - Issue an identity token
// - GET  /api/auth/me    - Introspect the current session
//
// ============================================================================

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::identity::Identity;
use crate::auth::roles::{resolve_role, Role};
use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::extractors::CurrentIdentity;
use crate::utils::log_safe_id;
use crate::validation::{is_valid_email, normalize_email, sanitize_text};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token expiration timestamp (Unix epoch seconds)
    pub expires_at: i64,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// POST /api/auth/login
///
/// Demo mode accepts any non-empty password for any well-formed address and
/// derives the role from the email alone. Real mode defers to the
/// credential store. Unknown user and wrong password produce the same
/// response, after a randomized delay that blunts timing-based enumeration.
pub async fn login(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&sanitize_text(&request.email));
    if !is_valid_email(&email) {
        return Err(AppError::validation("malformed email address"));
    }

    if ctx.config.demo_mode {
        if request.password.is_empty() {
            return Err(credential_failure().await);
        }
        let role = resolve_role(&email);
        // The address doubles as the subject: demo identities have no
        // backing user record, and the subject must be stable across logins.
        let (token, expires_at) = ctx
            .tokens
            .issue(&email, &email, role, None)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to issue demo token");
                AppError::internal("token issuance failed")
            })?;

        tracing::info!(
            user_hash = %log_safe_id(&email, &ctx.config.log_hash_salt),
            role = %role,
            "Demo login"
        );

        return Ok((
            StatusCode::OK,
            Json(LoginResponse {
                token,
                expires_at,
                user: SessionUser {
                    id: email.clone(),
                    email,
                    role,
                    tenant_id: None,
                },
            }),
        ));
    }

    let record = match ctx.credentials.verify(&email, &request.password).await {
        Ok(Some(record)) => record,
        Ok(None) => return Err(credential_failure().await),
        Err(e) => {
            tracing::error!(error = %e, "Credential store lookup failed");
            return Err(AppError::internal("login failed"));
        }
    };

    let (token, expires_at) = ctx
        .tokens
        .issue(&record.id, &record.email, record.role, record.tenant_id.clone())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to issue token");
            AppError::internal("token issuance failed")
        })?;

    tracing::info!(
        user_hash = %log_safe_id(&record.email, &ctx.config.log_hash_salt),
        role = %record.role,
        "Login succeeded"
    );

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            expires_at,
            user: SessionUser {
                id: record.id,
                email: record.email,
                role: record.role,
                tenant_id: record.tenant_id,
            },
        }),
    ))
}

/// Uniform failure path for bad credentials. The 1–2 s randomized delay is
/// applied before the response so the caller cannot distinguish "unknown
/// user" from "wrong password" by latency.
async fn credential_failure() -> AppError {
    let delay_ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(1_000..=2_000)
    };
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    AppError::InvalidCredentials
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub subject: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    pub expires_at: i64,
}

/// GET /api/auth/me
///
/// Introspects the identity the authentication gate resolved. Anonymous
/// callers only exist outside demo mode and are rejected here.
pub async fn me(
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<impl IntoResponse, AppError> {
    match identity {
        Identity::Authenticated(claims) => Ok(Json(SessionInfo {
            subject: claims.sub,
            email: claims.email,
            role: claims.role,
            tenant_id: claims.tenant_id,
            expires_at: claims.exp,
        })),
        Identity::Anonymous => Err(AppError::Unauthorized),
    }
}
