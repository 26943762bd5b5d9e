//! Common test utilities and helpers
//!
//! Starts a stub gateway and builds clients pointed at it.

#![allow(dead_code)]

use serde_json::Value;
use upush::{Client, ClientConfig, RawClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};
use tracing_subscriber::EnvFilter;

pub const APP_KEY: &str = "K";
pub const SECRET: &str = "S";

/// Stub gateway plus a client configured for it
pub struct TestGateway {
    pub server: MockServer,
}

impl TestGateway {
    pub async fn start() -> Self {
        init_tracing();
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            https_gateway_url: self.server.uri(),
            ..ClientConfig::new(APP_KEY, SECRET)
        }
    }

    pub fn client(&self) -> Client {
        Client::from_config(self.config()).expect("Failed to create client")
    }

    pub fn raw_client(&self) -> RawClient {
        RawClient::new(self.config()).expect("Failed to create raw client")
    }

    /// Respond to `POST {path}` with the given status and JSON body
    pub async fn respond_json(&self, endpoint: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond to `POST {path}` with the given status and raw text body
    pub async fn respond_text(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .expect("Request recording is enabled by default")
    }

    /// Full endpoint URL the client signs over
    pub fn endpoint(&self, endpoint: &str) -> String {
        format!("{}{}", self.server.uri(), endpoint)
    }
}

/// Route client logs to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Decode a recorded request's JSON body
pub fn body_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("Request body should be JSON")
}

/// Value of the `sign` query parameter
pub fn sign_param(request: &Request) -> String {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == "sign")
        .map(|(_, value)| value.into_owned())
        .expect("Request should carry a sign parameter")
}
