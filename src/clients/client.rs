use async_trait::async_trait;

use super::raw::RawClient;
use super::traits::PushApi;
use crate::config::ClientConfig;
use crate::errors::UpushResult;
use crate::models::{
    CastTarget, Payload, SendOptions, SendParam, SendResult, UploadParam, UploadResult,
};

/// Convenience client built on [`RawClient`]
///
/// Adds one method per common cast type so callers do not assemble a
/// [`SendParam`] by hand.
#[derive(Debug, Clone)]
pub struct Client {
    raw: RawClient,
}

impl Client {
    /// Create a client for the default TLS gateway
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> UpushResult<Self> {
        Self::from_config(ClientConfig::new(app_key, app_master_secret))
    }

    pub fn from_config(config: ClientConfig) -> UpushResult<Self> {
        Ok(Self {
            raw: RawClient::new(config)?,
        })
    }

    pub fn from_raw(raw: RawClient) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &RawClient {
        &self.raw
    }

    /// Switch between the TLS (default) and plaintext gateway
    pub fn set_https(&mut self, https: bool) {
        self.raw.set_https(https);
    }

    pub fn gateway_url(&self) -> &str {
        self.raw.gateway_url()
    }

    pub async fn send(&self, param: &SendParam) -> UpushResult<SendResult> {
        self.raw.send(param).await
    }

    pub async fn send_unicast(
        &self,
        device_token: impl Into<String>,
        payload: impl Into<Payload>,
        options: SendOptions,
    ) -> UpushResult<SendResult> {
        let param = SendParam::new(CastTarget::unicast(device_token), payload).with_options(options);
        self.raw.send(&param).await
    }

    pub async fn send_listcast<I, S>(
        &self,
        device_tokens: I,
        payload: impl Into<Payload>,
        options: SendOptions,
    ) -> UpushResult<SendResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let param = SendParam::new(CastTarget::listcast(device_tokens), payload).with_options(options);
        self.raw.send(&param).await
    }

    pub async fn send_broadcast(
        &self,
        payload: impl Into<Payload>,
        options: SendOptions,
    ) -> UpushResult<SendResult> {
        let param = SendParam::new(CastTarget::Broadcast, payload).with_options(options);
        self.raw.send(&param).await
    }

    /// Send to every device token in a previously uploaded file
    pub async fn send_filecast(
        &self,
        file_id: impl Into<String>,
        payload: impl Into<Payload>,
        options: SendOptions,
    ) -> UpushResult<SendResult> {
        let param = SendParam::new(CastTarget::filecast(file_id), payload).with_options(options);
        self.raw.send(&param).await
    }

    /// Send to developer-defined aliases of one alias type
    pub async fn send_customizedcast<I, S>(
        &self,
        alias_type: impl Into<String>,
        aliases: I,
        payload: impl Into<Payload>,
        options: SendOptions,
    ) -> UpushResult<SendResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let param = SendParam::new(CastTarget::aliases(alias_type, aliases), payload)
            .with_options(options);
        self.raw.send(&param).await
    }

    /// Upload device tokens or aliases, returning the file id in the result
    pub async fn upload<I, S>(&self, tokens: I) -> UpushResult<UploadResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.raw.upload(&UploadParam::from_tokens(tokens)).await
    }
}

#[async_trait]
impl PushApi for Client {
    async fn send(&self, param: &SendParam) -> UpushResult<SendResult> {
        Client::send(self, param).await
    }

    async fn upload(&self, tokens: &[String]) -> UpushResult<UploadResult> {
        Client::upload(self, tokens).await
    }

    fn gateway_url(&self) -> &str {
        Client::gateway_url(self)
    }
}
