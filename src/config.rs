use anyhow::Result;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8080;

// Default token lifetime (in days)
const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

// Default fixed-window rate limit policies
const DEFAULT_GENERAL_WINDOW_SECS: u64 = 900;
const DEFAULT_GENERAL_MAX: u32 = 300;
const DEFAULT_AUTH_WINDOW_SECS: u64 = 900;
const DEFAULT_AUTH_MAX: u32 = 20;
const DEFAULT_API_WINDOW_SECS: u64 = 60;
const DEFAULT_API_MAX: u32 = 100;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Minimum number of characters for the token signing key
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Signing key values that ship in examples and must never reach production
const PLACEHOLDER_SIGNING_KEYS: &[&str] = &[
    "changeme",
    "change-me",
    "secret",
    "your-secret-key",
    "your_jwt_secret",
    "dev-secret",
];

// Dev-server origins permitted when no explicit CORS list is configured
const LOCALHOST_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];

// ============================================================================
// Configuration Structures
// ============================================================================

/// Fixed-window rate limit ceilings, per policy class
#[derive(Clone, Debug)]
pub struct RateConfig {
    pub general_window_secs: u64,
    pub general_max: u32,
    /// Narrow ceiling on the login route to blunt credential stuffing
    pub auth_window_secs: u64,
    pub auth_max: u32,
    pub api_window_secs: u64,
    pub api_max: u32,
    /// Period of the background sweep that evicts expired counter entries
    pub sweep_interval_secs: u64,
}

impl RateConfig {
    pub(crate) fn from_env() -> Self {
        Self {
            general_window_secs: std::env::var("RATE_GENERAL_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GENERAL_WINDOW_SECS),
            general_max: std::env::var("RATE_GENERAL_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GENERAL_MAX),
            auth_window_secs: std::env::var("RATE_AUTH_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUTH_WINDOW_SECS),
            auth_max: std::env::var("RATE_AUTH_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_AUTH_MAX),
            api_window_secs: std::env::var("RATE_API_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_API_WINDOW_SECS),
            api_max: std::env::var("RATE_API_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_API_MAX),
            sweep_interval_secs: std::env::var("RATE_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// True when APP_ENV=production; weak-key validation is fatal here
    pub production: bool,
    /// HMAC signing key for identity tokens
    pub jwt_secret: String,
    /// Token lifetime in days (default 7)
    pub token_ttl_days: i64,
    /// Relaxes authentication and disables rate limiting for sandbox deployments.
    /// Not a security boundary.
    pub demo_mode: bool,
    /// Allowed cross-origin values; empty outside production falls back to localhost
    pub allowed_origins: Vec<String>,
    pub rate: RateConfig,
    /// Salt for hashing identifiers before they reach logs
    pub log_hash_salt: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        validate_signing_key(&jwt_secret, production)?;

        let demo_mode = std::env::var("DEMO_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            production,
            jwt_secret,
            token_ttl_days: std::env::var("TOKEN_TTL_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_TTL_DAYS),
            demo_mode,
            allowed_origins,
            rate: RateConfig::from_env(),
            log_hash_salt: std::env::var("LOG_HASH_SALT")
                .unwrap_or_else(|_| "escola-gateway".to_string()),
        })
    }

    /// CORS origins actually served: the configured list, or the localhost
    /// dev origins when the list is empty outside production. An empty list
    /// in production allows no cross-origin callers.
    pub fn effective_origins(&self) -> Vec<String> {
        if !self.allowed_origins.is_empty() {
            return self.allowed_origins.clone();
        }
        if self.production {
            tracing::warn!("ALLOWED_ORIGINS is empty in production; no cross-origin requests will be accepted");
            return Vec::new();
        }
        LOCALHOST_ORIGINS.iter().map(|s| s.to_string()).collect()
    }
}

/// Validate the token signing key once at startup.
///
/// An absent or empty key is always fatal. A key that is too short or equal
/// to a known placeholder is fatal in production and a warning elsewhere, so
/// local sandboxes keep working while a guessable key can never ship.
pub fn validate_signing_key(secret: &str, production: bool) -> Result<()> {
    if secret.trim().is_empty() {
        anyhow::bail!("JWT_SECRET must be set to a non-empty value");
    }

    let placeholder = PLACEHOLDER_SIGNING_KEYS
        .iter()
        .any(|p| secret.eq_ignore_ascii_case(p));
    let too_short = secret.len() < MIN_SIGNING_KEY_LEN;

    if placeholder || too_short {
        let reason = if placeholder {
            "JWT_SECRET equals a known placeholder value"
        } else {
            "JWT_SECRET is shorter than the 32-character minimum"
        };
        if production {
            anyhow::bail!(
                "{}. Generate a strong key with: openssl rand -base64 32",
                reason
            );
        }
        tracing::warn!(
            "{}; continuing because APP_ENV is not production. Do not deploy with this key.",
            reason
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_KEY: &str = "k2f8Qw1zX9vB4nM7pL0sD3gH6jT5yU8c";

    #[test]
    fn strong_key_passes_everywhere() {
        assert!(validate_signing_key(STRONG_KEY, true).is_ok());
        assert!(validate_signing_key(STRONG_KEY, false).is_ok());
    }

    #[test]
    fn short_key_fails_only_in_production() {
        assert!(validate_signing_key("tiny", true).is_err());
        assert!(validate_signing_key("tiny", false).is_ok());
    }

    #[test]
    fn placeholder_key_fails_in_production() {
        assert!(validate_signing_key("changeme", true).is_err());
        assert!(validate_signing_key("Your-Secret-Key", true).is_err());
        assert!(validate_signing_key("changeme", false).is_ok());
    }

    #[test]
    fn empty_key_fails_everywhere() {
        assert!(validate_signing_key("", true).is_err());
        assert!(validate_signing_key("   ", false).is_err());
    }

    fn config_with_origins(origins: Vec<String>, production: bool) -> Config {
        Config {
            port: 0,
            production,
            jwt_secret: STRONG_KEY.to_string(),
            token_ttl_days: 7,
            demo_mode: false,
            allowed_origins: origins,
            rate: RateConfig {
                general_window_secs: 900,
                general_max: 300,
                auth_window_secs: 900,
                auth_max: 20,
                api_window_secs: 60,
                api_max: 100,
                sweep_interval_secs: 60,
            },
            log_hash_salt: "test".to_string(),
        }
    }

    #[test]
    fn empty_origins_fall_back_to_localhost_outside_production() {
        let config = config_with_origins(Vec::new(), false);
        let origins = config.effective_origins();
        assert!(origins.iter().any(|o| o.contains("localhost")));
    }

    #[test]
    fn empty_origins_stay_empty_in_production() {
        let config = config_with_origins(Vec::new(), true);
        assert!(config.effective_origins().is_empty());
    }

    #[test]
    fn configured_origins_win() {
        let config =
            config_with_origins(vec!["https://portal.escola.com".to_string()], true);
        assert_eq!(
            config.effective_origins(),
            vec!["https://portal.escola.com".to_string()]
        );
    }
}
