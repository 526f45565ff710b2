//! Login-record lookup seam.
//!
//! The gateway never owns persistence; real deployments back this trait
//! with the platform's user store. The in-memory implementation seeds the
//! sandbox fixtures and doubles as the test double.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::auth::roles::{resolve_role, Role};

/// Login record produced by a successful credential check.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub tenant_id: Option<String>,
}

/// Credential verification, uniform over "unknown user" and "wrong
/// password": both return `Ok(None)`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Result<Option<UserRecord>>;
}

/// In-memory credential store for sandbox deployments and tests.
pub struct DemoCredentialStore {
    users: HashMap<String, (String, UserRecord)>,
}

const FIXTURE_EMAILS: &[&str] = &[
    "admin@escola.com",
    "prof.silva@escola.com",
    "secretaria@escola.com",
    "tesouraria@escola.com",
    "educacao@cidade.gov.br",
    "aluno.souza@escola.com",
];

const FIXTURE_PASSWORD: &str = "escola123";

impl DemoCredentialStore {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
        }
    }

    /// Store seeded with one user per role, password `escola123`.
    pub fn with_fixtures() -> Self {
        let mut store = Self::new();
        for email in FIXTURE_EMAILS {
            store.add_user(email, FIXTURE_PASSWORD, resolve_role(email));
        }
        store
    }

    pub fn add_user(&mut self, email: &str, password: &str, role: Role) {
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role,
            tenant_id: None,
        };
        self.users
            .insert(email.to_string(), (password.to_string(), record));
    }
}

impl Default for DemoCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for DemoCredentialStore {
    async fn verify(&self, email: &str, password: &str) -> Result<Option<UserRecord>> {
        match self.users.get(email) {
            Some((stored, record)) => {
                // Constant-time comparison; slices of unequal length compare
                // unequal without early exit.
                if bool::from(stored.as_bytes().ct_eq(password.as_bytes())) {
                    Ok(Some(record.clone()))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }
}
