//! Role model and demo-mode role resolution.
//!
//! In demo deployments the caller's role is derived from the email address
//! alone, so the resolver must be deterministic: the same address always
//! yields the same role, both at login (token minting) and when a request
//! falls back to demo identity.

use serde::{Deserialize, Serialize};

/// Closed set of roles known to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    Secretary,
    Treasury,
    EducationSecretary,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Secretary => "secretary",
            Role::Treasury => "treasury",
            Role::EducationSecretary => "education_secretary",
            Role::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered keyword→role decision table for demo identity resolution.
///
/// Order is load-bearing: the first matching rule wins, so an address
/// containing both "secretaria" and "educacao" resolves to Secretary.
/// Reordering this table changes observable behavior.
const ROLE_RULES: &[(&str, Role)] = &[
    ("tesouraria", Role::Treasury),
    ("prof", Role::Teacher),
    ("secretaria", Role::Secretary),
    ("educacao", Role::EducationSecretary),
    ("aluno", Role::Student),
];

/// Resolve a role from an email address by case-insensitive substring match
/// against [`ROLE_RULES`], falling through to Admin when nothing matches.
///
/// Pure and total: every input maps to exactly one role.
pub fn resolve_role(email: &str) -> Role {
    let email = email.to_lowercase();
    for (keyword, role) in ROLE_RULES {
        if email.contains(keyword) {
            return *role;
        }
    }
    Role::Admin
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_emails_resolve_to_their_role() {
        assert_eq!(resolve_role("tesouraria@escola.com"), Role::Treasury);
        assert_eq!(resolve_role("prof.silva@escola.com"), Role::Teacher);
        assert_eq!(resolve_role("secretaria@escola.com"), Role::Secretary);
        assert_eq!(resolve_role("educacao@cidade.gov.br"), Role::EducationSecretary);
        assert_eq!(resolve_role("aluno.souza@escola.com"), Role::Student);
    }

    #[test]
    fn unmatched_email_defaults_to_admin() {
        assert_eq!(resolve_role("random@x.com"), Role::Admin);
        assert_eq!(resolve_role("diretor@escola.com"), Role::Admin);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(resolve_role("TESOURARIA@ESCOLA.COM"), Role::Treasury);
        assert_eq!(resolve_role("Prof.Silva@Escola.com"), Role::Teacher);
    }

    #[test]
    fn first_rule_wins_on_overlap() {
        // Contains both "secretaria" and "educacao"; list order decides.
        assert_eq!(
            resolve_role("secretaria.educacao@cidade.gov.br"),
            Role::Secretary
        );
        // "tesouraria" outranks "prof"
        assert_eq!(resolve_role("prof.tesouraria@escola.com"), Role::Treasury);
    }

    #[test]
    fn resolution_is_stable_across_calls() {
        let email = "prof.ana@escola.com";
        let first = resolve_role(email);
        for _ in 0..10 {
            assert_eq!(resolve_role(email), first);
        }
    }
}
