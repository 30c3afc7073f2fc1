//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{AfiniError, AfiniResult};

/// Default service endpoint used when no override is supplied.
pub const DEFAULT_ENDPOINT: &str = "http://api.afinimaki.com/RPC2";

/// Required length of both the API key and the API secret.
pub const KEY_LENGTH: usize = 32;

/// Immutable client configuration, validated at construction.
///
/// Construction performs no network I/O; bad credentials only surface as
/// server faults when a call is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key, exactly 32 characters.
    pub api_key: String,
    /// API secret, exactly 32 characters. Participates in the per-call
    /// authentication digest and never travels on the wire itself.
    pub api_secret: String,
    /// Service endpoint URL.
    pub endpoint: String,
    /// Emit one diagnostic line to stderr per call before dispatch.
    #[serde(default)]
    pub debug: bool,
    /// Turn local validation short-circuits into errors instead of
    /// silently returning empty results.
    #[serde(default)]
    pub strict: bool,
}

impl ClientConfig {
    /// Create a configuration with the default endpoint.
    pub fn new(api_key: &str, api_secret: &str) -> AfiniResult<Self> {
        Self::with_options(api_key, api_secret, None, false)
    }

    /// Create a configuration with an optional endpoint override and debug flag.
    pub fn with_options(
        api_key: &str,
        api_secret: &str,
        endpoint: Option<&str>,
        debug: bool,
    ) -> AfiniResult<Self> {
        if api_key.chars().count() != KEY_LENGTH {
            return Err(AfiniError::invalid_key_length("api_key"));
        }
        if api_secret.chars().count() != KEY_LENGTH {
            return Err(AfiniError::invalid_key_length("api_secret"));
        }

        let endpoint = match endpoint {
            Some(url) => {
                if !url.starts_with("http://") {
                    return Err(AfiniError::invalid_endpoint(url));
                }
                url.to_string()
            }
            None => DEFAULT_ENDPOINT.to_string(),
        };

        Ok(Self {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            endpoint,
            debug,
            strict: false,
        })
    }

    /// Create a configuration from environment variables.
    ///
    /// Reads `AFINIMAKI_API_KEY`, `AFINIMAKI_API_SECRET`, and optionally
    /// `AFINIMAKI_ENDPOINT` and `AFINIMAKI_DEBUG`.
    pub fn from_env() -> AfiniResult<Self> {
        let api_key = std::env::var("AFINIMAKI_API_KEY")
            .map_err(|_| AfiniError::missing_env("AFINIMAKI_API_KEY"))?;
        let api_secret = std::env::var("AFINIMAKI_API_SECRET")
            .map_err(|_| AfiniError::missing_env("AFINIMAKI_API_SECRET"))?;

        let endpoint = std::env::var("AFINIMAKI_ENDPOINT").ok();
        let debug = std::env::var("AFINIMAKI_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self::with_options(&api_key, &api_secret, endpoint.as_deref(), debug)
    }

    /// Enable or disable strict validation.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef";
    const SECRET: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_valid_construction_applies_default_endpoint() {
        let config = ClientConfig::new(KEY, SECRET).unwrap();
        assert_eq!(config.api_key, KEY);
        assert_eq!(config.api_secret, SECRET);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(!config.debug);
        assert!(!config.strict);
    }

    #[test]
    fn test_short_key_rejected() {
        let err = ClientConfig::new("too-short", SECRET).unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn test_long_secret_rejected() {
        let long = format!("{}x", SECRET);
        let err = ClientConfig::new(KEY, &long).unwrap_err();
        assert!(err.to_string().contains("api_secret"));
    }

    #[test]
    fn test_endpoint_override_kept() {
        let config =
            ClientConfig::with_options(KEY, SECRET, Some("http://localhost:8080/RPC2"), true)
                .unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/RPC2");
        assert!(config.debug);
    }

    #[test]
    fn test_non_http_endpoint_rejected() {
        let err = ClientConfig::with_options(KEY, SECRET, Some("https://example.com/RPC2"), false)
            .unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_with_strict() {
        let config = ClientConfig::new(KEY, SECRET).unwrap().with_strict(true);
        assert!(config.strict);
    }
}
