//! Gateway connection configuration.
//!
//! Constructed once at startup and passed down explicitly; nothing in the
//! workspace reads ambient globals for gateway settings.

use serde::{Deserialize, Serialize};

/// Connection settings for the sync gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Static anonymous key, used when no session token is present.
    pub anon_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: anon_key.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Read gateway settings from the environment, if both are present.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("REHOBOAM_GATEWAY_URL").ok()?;
        let anon_key = std::env::var("REHOBOAM_GATEWAY_ANON_KEY").ok()?;
        Some(Self::new(base_url, anon_key))
    }
}

/// An authenticated gateway session.
///
/// The access token supersedes the anonymous key, and the session user id
/// supersedes the local instance identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_when_absent_from_config() {
        let config: GatewayConfig = serde_json::from_str(
            r#"{"base_url": "https://gw.example", "anon_key": "anon"}"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 10);
    }
}
