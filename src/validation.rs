//! Shared input sanitization helpers used by the gateway surface.

/// Longest email the gateway accepts
const MAX_EMAIL_LEN: usize = 254;

/// Canonical form for an email address: trimmed and lowercased, so role
/// resolution and credential lookups are case-insensitive.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Shallow shape check; real mailbox validation belongs to the mail system.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

/// Strip control characters and trim surrounding whitespace from free-text
/// input before it is validated or logged.
pub fn sanitize_text(raw: &str) -> String {
    raw.trim().chars().filter(|c| !c.is_control()).collect()
}
