//! Error types for the upush client
//!
//! Every failure a call can hit is represented here, grouped by the layer that
//! produced it: request validation, JSON encoding, HTTP transport, response
//! decoding, and the vendor's own `ret` status.

use thiserror::Error;

/// Main error type returned by every client operation
#[derive(Error, Debug)]
pub enum UpushError {
    // Request validation
    #[error("Invalid request field '{field}': {reason}")]
    InvalidRequest {
        field: String,
        reason: String,
    },

    // Serialization errors
    #[error("JSON encoding error: {context}")]
    Encoding {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON decoding error: {context}")]
    Decoding {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Network and HTTP errors
    #[error("HTTP request failed: {method} {url}")]
    Http {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
    },

    #[error("HTTP {status_code}: {reason}")]
    HttpStatus {
        status_code: u16,
        reason: String,
    },

    // Vendor-level failure carried in a decoded response
    #[error("{message}, code={code}")]
    Vendor {
        code: String,
        message: String,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using UpushError
pub type UpushResult<T> = Result<T, UpushError>;

impl UpushError {
    /// Create a new InvalidRequest error
    pub fn invalid_request(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Encoding error
    pub fn encoding(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encoding {
            context: context.into(),
            source,
        }
    }

    /// Create a new Decoding error
    pub fn decoding(context: impl Into<String>) -> Self {
        Self::Decoding {
            context: context.into(),
            source: None,
        }
    }

    /// Create a new Decoding error with source
    pub fn decoding_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Decoding {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new Config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new Vendor error from the response's error fields
    pub fn vendor(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Vendor {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a reqwest failure for the given request into a transport error
    pub fn from_reqwest(method: &str, url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                method: method.to_string(),
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Whether the failure happened on the wire rather than in the payload or response
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }

    /// Vendor error code, if the gateway rejected the request
    pub fn vendor_code(&self) -> Option<&str> {
        match self {
            Self::Vendor { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Check if retrying the same call could succeed.
    ///
    /// The client never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Http { .. } => true,
            Self::HttpStatus { status_code, .. } => {
                *status_code >= 500 || *status_code == 408 || *status_code == 429
            }
            _ => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "validation",
            Self::Encoding { .. } => "encoding",
            Self::Http { .. } | Self::Timeout { .. } | Self::HttpStatus { .. } => "transport",
            Self::Decoding { .. } => "decoding",
            Self::Vendor { .. } => "vendor",
            Self::Config { .. } => "config",
        }
    }
}

impl From<toml::de::Error> for UpushError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("TOML parsing error: {}", err.message()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<url::ParseError> for UpushError {
    fn from(err: url::ParseError) -> Self {
        Self::config_with_source("Invalid gateway URL", err)
    }
}
