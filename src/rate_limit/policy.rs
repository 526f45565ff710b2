use chrono::Duration;

use crate::config::RateConfig;

/// Immutable per-route-class rate limit configuration.
///
/// Policies are built once at startup and attached to route groups; they
/// never change at runtime.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    /// Short name, also the entry-key prefix in the shared counter store
    pub name: &'static str,
    pub window: Duration,
    pub max: u32,
    /// Body text of the quota-exceeded response
    pub message: String,
    /// Roll the increment back when the response is a non-error status.
    /// Only the auth policy uses this, so repeated successful logins don't
    /// consume attempts allotted for failed ones.
    pub skip_successful_requests: bool,
}

impl RateLimitPolicy {
    /// Wide window, high ceiling: applied in front of every route.
    pub fn general(rate: &RateConfig) -> Self {
        Self {
            name: "general",
            window: Duration::seconds(rate.general_window_secs as i64),
            max: rate.general_max,
            message: "Too many requests from this address, please try again later".to_string(),
            skip_successful_requests: false,
        }
    }

    /// Narrow ceiling on the login route to blunt credential stuffing.
    pub fn auth(rate: &RateConfig) -> Self {
        Self {
            name: "auth",
            window: Duration::seconds(rate.auth_window_secs as i64),
            max: rate.auth_max,
            message: "Too many login attempts, please try again later".to_string(),
            skip_successful_requests: true,
        }
    }

    /// Mid-tier ceiling for the API surface.
    pub fn api(rate: &RateConfig) -> Self {
        Self {
            name: "api",
            window: Duration::seconds(rate.api_window_secs as i64),
            max: rate.api_max,
            message: "API rate limit exceeded, please slow down".to_string(),
            skip_successful_requests: false,
        }
    }
}
