use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use std::net::SocketAddr;

/// Derive the rate-limit client key for a request.
///
/// Prefers the first entry of `X-Forwarded-For` (the reverse proxy is
/// expected to set it and strip untrusted values), then the peer address,
/// then a shared fallback bucket.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Creates a truncated, salted hash of an identifier for safe logging.
///
/// Raw emails and user ids never reach the logs; this short digest still
/// lets operators correlate events for one caller.
pub fn log_safe_id(id: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(id.as_bytes());
    let hash = hasher.finalize();

    hash[..4]
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> SocketAddr {
        "10.0.0.9:4444".parse().unwrap()
    }

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
        assert_eq!(client_key(&headers, Some(peer())), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, Some(peer())), "10.0.0.9");
    }

    #[test]
    fn empty_forwarded_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "".parse().unwrap());
        assert_eq!(client_key(&headers, Some(peer())), "10.0.0.9");
    }

    #[test]
    fn falls_back_to_shared_bucket_without_peer() {
        let headers = HeaderMap::new();
        assert_eq!(client_key(&headers, None), "unknown");
    }

    #[test]
    fn log_safe_id_is_stable_and_salted() {
        let a = log_safe_id("prof.silva@escola.com", "salt-1");
        assert_eq!(a, log_safe_id("prof.silva@escola.com", "salt-1"));
        assert_ne!(a, log_safe_id("prof.silva@escola.com", "salt-2"));
        assert_eq!(a.len(), 8);
        assert!(!a.contains('@'));
    }
}
