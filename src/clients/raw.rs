use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::ClientConfig;
use crate::errors::{UpushError, UpushResult};
use crate::models::{unix_timestamp, ApiResult, SendParam, SendResult, UploadParam, UploadResult};
use crate::sign::sign;

pub const SEND_PATH: &str = "/api/send";
pub const UPLOAD_PATH: &str = "/upload";

/// Thin wrapper over the gateway's HTTP API.
///
/// Each call serializes its parameters, signs them, and decodes the response.
/// Clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RawClient {
    http: HttpClient,
    config: ClientConfig,
}

impl RawClient {
    /// Create a new client with its own HTTP connection pool
    pub fn new(config: ClientConfig) -> UpushResult<Self> {
        config.validate()?;

        let mut builder = HttpClient::builder()
            .tcp_keepalive(Duration::from_secs(60))
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout_secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let http = builder
            .build()
            .map_err(|e| UpushError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self { http, config })
    }

    /// Create a client that reuses an existing HTTP client
    pub fn with_http_client(config: ClientConfig, http: HttpClient) -> UpushResult<Self> {
        config.validate()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Switch between the TLS (default) and plaintext gateway.
    ///
    /// Takes `&mut self`, so it cannot run while a request borrows the client.
    pub fn set_https(&mut self, https: bool) {
        self.config.https = https;
    }

    pub fn gateway_url(&self) -> &str {
        self.config.gateway_url()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.gateway_url().trim_end_matches('/'), path)
    }

    /// Send a notification; app key and timestamp are stamped here
    pub async fn send(&self, param: &SendParam) -> UpushResult<SendResult> {
        self.send_with_timeout(param, None).await
    }

    /// Send with a deadline overriding the client's default timeout
    pub async fn send_with_timeout(
        &self,
        param: &SendParam,
        timeout: Option<Duration>,
    ) -> UpushResult<SendResult> {
        param.validate()?;
        let body = param.to_body(&self.config.app_key, unix_timestamp());
        self.execute(Method::POST, &self.endpoint(SEND_PATH), &body, timeout)
            .await
    }

    /// Upload a recipient file; app key and timestamp are stamped here
    pub async fn upload(&self, param: &UploadParam) -> UpushResult<UploadResult> {
        self.upload_with_timeout(param, None).await
    }

    pub async fn upload_with_timeout(
        &self,
        param: &UploadParam,
        timeout: Option<Duration>,
    ) -> UpushResult<UploadResult> {
        param.validate()?;
        let body = param.to_body(&self.config.app_key, unix_timestamp());
        self.execute(Method::POST, &self.endpoint(UPLOAD_PATH), &body, timeout)
            .await
    }

    /// One signed request/response cycle.
    ///
    /// `url` is the full endpoint without query; the signature is computed over
    /// it and appended as `?sign=`.
    pub async fn execute<P, R>(
        &self,
        method: Method,
        url: &str,
        payload: &P,
        timeout: Option<Duration>,
    ) -> UpushResult<R>
    where
        P: Serialize + ?Sized,
        R: ApiResult,
    {
        let body = serde_json::to_vec(payload)
            .map_err(|e| UpushError::encoding("serialize request body", e))?;
        let signature = sign(method.as_str(), url, &body, &self.config.app_master_secret);
        let signed_url = format!("{url}?sign={signature}");

        debug!(%method, %url, body_len = body.len(), "Sending gateway request");

        let mut request = self
            .http
            .request(method.clone(), &signed_url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpushError::from_reqwest(method.as_str(), url, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), %url, "Gateway responded");
        check_status(status)?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpushError::from_reqwest(method.as_str(), url, e))?;
        if bytes.is_empty() {
            return Err(UpushError::decoding("empty gateway response"));
        }
        let result: R = serde_json::from_slice(&bytes)
            .map_err(|e| UpushError::decoding_with_source("decode gateway response", e))?;

        trace!(success = result.is_success(), "Decoded gateway response");

        match result.to_error() {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }
}

/// Reject statuses above 400.
///
/// A 400 is let through because the gateway puts a decodable `FAIL` body on it.
pub fn check_status(status: StatusCode) -> UpushResult<()> {
    if status.as_u16() > 400 {
        return Err(UpushError::HttpStatus {
            status_code: status.as_u16(),
            reason: status.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HTTPS_GATEWAY_URL, HTTP_GATEWAY_URL};

    #[test]
    fn test_status_boundary() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::FOUND).is_ok());
        assert!(check_status(StatusCode::BAD_REQUEST).is_ok());

        match check_status(StatusCode::UNAUTHORIZED) {
            Err(UpushError::HttpStatus { status_code, reason }) => {
                assert_eq!(status_code, 401);
                assert_eq!(reason, "401 Unauthorized");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
        assert!(check_status(StatusCode::INTERNAL_SERVER_ERROR).is_err());
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = RawClient::new(ClientConfig::new("K", "S"));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_client_rejects_empty_credentials() {
        let client = RawClient::new(ClientConfig::new("", "S"));
        assert!(matches!(client, Err(UpushError::Config { .. })));
    }

    #[tokio::test]
    async fn test_shared_http_client() {
        let http = HttpClient::new();
        let client = RawClient::with_http_client(ClientConfig::new("K", "S"), http).unwrap();
        assert_eq!(client.config().app_key, "K");
        assert!(RawClient::with_http_client(ClientConfig::new("K", " "), HttpClient::new()).is_err());
    }

    #[tokio::test]
    async fn test_endpoint_building() {
        let mut config = ClientConfig::new("K", "S");
        config.https_gateway_url = "http://127.0.0.1:8080/".to_string();
        let client = RawClient::new(config).unwrap();
        assert_eq!(client.endpoint(SEND_PATH), "http://127.0.0.1:8080/api/send");
    }

    #[tokio::test]
    async fn test_https_toggle() {
        let mut client = RawClient::new(ClientConfig::new("K", "S")).unwrap();
        assert_eq!(client.gateway_url(), HTTPS_GATEWAY_URL);

        client.set_https(false);
        assert_eq!(client.gateway_url(), HTTP_GATEWAY_URL);
        assert_eq!(client.endpoint(UPLOAD_PATH), "http://msg.umeng.com/upload");

        client.set_https(true);
        assert_eq!(client.gateway_url(), HTTPS_GATEWAY_URL);
    }
}
