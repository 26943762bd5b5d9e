use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::errors::{UpushError, UpushResult};

/// TLS gateway, used unless the client is switched to plaintext
pub const HTTPS_GATEWAY_URL: &str = "https://msgapi.umeng.com";
/// Plaintext gateway
pub const HTTP_GATEWAY_URL: &str = "http://msg.umeng.com";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("upush/", env!("CARGO_PKG_VERSION"));

/// Configuration for a push client
///
/// Holds the application credentials and the gateway endpoints. The gateway
/// URLs default to the vendor's public endpoints and are only overridden to
/// point at a test double or a proxy.
///
/// # Example
///
/// ```rust
/// use upush::config::ClientConfig;
///
/// let config = ClientConfig::from_toml_str(r#"
///     app_key = "my-app-key"
///     app_master_secret = "my-secret"
///     timeout_secs = 10
/// "#).unwrap();
/// assert_eq!(config.gateway_url(), "https://msgapi.umeng.com");
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub app_key: String,
    pub app_master_secret: String,
    #[serde(default = "default_https")]
    pub https: bool,
    #[serde(default = "default_https_gateway_url")]
    pub https_gateway_url: String,
    #[serde(default = "default_http_gateway_url")]
    pub http_gateway_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: Option<String>,
}

fn default_https() -> bool {
    true
}

fn default_https_gateway_url() -> String {
    HTTPS_GATEWAY_URL.to_string()
}

fn default_http_gateway_url() -> String {
    HTTP_GATEWAY_URL.to_string()
}

fn default_timeout_secs() -> Option<u64> {
    Some(DEFAULT_TIMEOUT_SECS)
}

fn default_user_agent() -> Option<String> {
    Some(DEFAULT_USER_AGENT.to_string())
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_key", &self.app_key)
            .field("app_master_secret", &"<redacted>")
            .field("https", &self.https)
            .field("https_gateway_url", &self.https_gateway_url)
            .field("http_gateway_url", &self.http_gateway_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Wrapper so a config can live under an `[umeng]` table of a larger file
#[derive(Deserialize)]
struct UmengSection {
    umeng: ClientConfig,
}

impl ClientConfig {
    /// Create a config with default gateways for the given credentials
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_master_secret: app_master_secret.into(),
            https: default_https(),
            https_gateway_url: default_https_gateway_url(),
            http_gateway_url: default_http_gateway_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Parse a config from TOML text.
    ///
    /// Accepts either the fields at the top level or nested under `[umeng]`.
    pub fn from_toml_str(content: &str) -> UpushResult<Self> {
        let value: toml::Value = toml::from_str(content)?;
        let config = if value.get("umeng").is_some() {
            UmengSection::deserialize(value)?.umeng
        } else {
            ClientConfig::deserialize(value)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Base URL of the gateway selected by the `https` flag
    pub fn gateway_url(&self) -> &str {
        if self.https {
            &self.https_gateway_url
        } else {
            &self.http_gateway_url
        }
    }

    /// Check credentials and gateway URLs
    pub fn validate(&self) -> UpushResult<()> {
        if self.app_key.trim().is_empty() {
            return Err(UpushError::config("app_key must not be empty"));
        }
        if self.app_master_secret.trim().is_empty() {
            return Err(UpushError::config("app_master_secret must not be empty"));
        }
        Url::parse(&self.https_gateway_url)?;
        Url::parse(&self.http_gateway_url)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("K", "S");
        assert!(config.https);
        assert_eq!(config.gateway_url(), HTTPS_GATEWAY_URL);
        assert_eq!(config.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plaintext_gateway_selection() {
        let config = ClientConfig {
            https: false,
            ..ClientConfig::new("K", "S")
        };
        assert_eq!(config.gateway_url(), HTTP_GATEWAY_URL);
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", ClientConfig::new("K", "super-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_from_toml_top_level() {
        let config = ClientConfig::from_toml_str(
            r#"
            app_key = "key"
            app_master_secret = "secret"
            https = false
            "#,
        )
        .unwrap();

        assert_eq!(config.app_key, "key");
        assert_eq!(config.gateway_url(), HTTP_GATEWAY_URL);
        assert_eq!(config.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_from_toml_umeng_section() {
        let config = ClientConfig::from_toml_str(
            r#"
            [umeng]
            app_key = "key"
            app_master_secret = "secret"
            https_gateway_url = "https://push.example.com"
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway_url(), "https://push.example.com");
        assert_eq!(config.timeout_secs, Some(5));
    }

    #[test]
    fn test_from_toml_rejects_empty_key() {
        let result = ClientConfig::from_toml_str(
            r#"
            app_key = ""
            app_master_secret = "secret"
            "#,
        );
        assert!(matches!(result, Err(UpushError::Config { .. })));
    }

    #[test]
    fn test_from_toml_rejects_bad_url() {
        let result = ClientConfig::from_toml_str(
            r#"
            app_key = "key"
            app_master_secret = "secret"
            http_gateway_url = "not a url"
            "#,
        );
        assert!(matches!(result, Err(UpushError::Config { .. })));
    }
}
