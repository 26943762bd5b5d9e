use std::future::Future;

use tokio::runtime::{Builder, Handle};

use super::client::Client;
use crate::config::ClientConfig;
use crate::errors::{UpushError, UpushResult};
use crate::models::{Payload, SendOptions, SendParam, SendResult, UploadResult};

/// Synchronous wrapper around [`Client`] for callers without an async runtime
///
/// Inside a multi-threaded Tokio runtime the call runs on the current handle via
/// `block_in_place`; otherwise a throwaway current-thread runtime drives it.
pub struct BlockingClient {
    inner: Client,
}

impl BlockingClient {
    pub fn new(app_key: impl Into<String>, app_master_secret: impl Into<String>) -> UpushResult<Self> {
        Self::from_config(ClientConfig::new(app_key, app_master_secret))
    }

    pub fn from_config(config: ClientConfig) -> UpushResult<Self> {
        Ok(Self {
            inner: Client::from_config(config)?,
        })
    }

    pub fn set_https(&mut self, https: bool) {
        self.inner.set_https(https);
    }

    pub fn gateway_url(&self) -> &str {
        self.inner.gateway_url()
    }

    /// Send a notification (blocking)
    pub fn send(&self, param: &SendParam) -> UpushResult<SendResult> {
        block_on(self.inner.send(param))
    }

    /// Send to a previously uploaded device token file (blocking)
    pub fn send_filecast(
        &self,
        file_id: impl Into<String>,
        payload: impl Into<Payload>,
        options: SendOptions,
    ) -> UpushResult<SendResult> {
        block_on(self.inner.send_filecast(file_id, payload, options))
    }

    /// Upload device tokens or aliases (blocking)
    pub fn upload<I, S>(&self, tokens: I) -> UpushResult<UploadResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        block_on(self.inner.upload(tokens))
    }
}

fn block_on<F, T>(future: F) -> UpushResult<T>
where
    F: Future<Output = UpushResult<T>>,
{
    match Handle::try_current() {
        Ok(handle) => tokio::task::block_in_place(|| handle.block_on(future)),
        Err(_) => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| UpushError::config_with_source("Failed to create runtime", e))?;
            runtime.block_on(future)
        }
    }
}
