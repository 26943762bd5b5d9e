use async_trait::async_trait;

use crate::errors::UpushResult;
use crate::models::{SendParam, SendResult, UploadResult};

/// Push gateway operations, for code that wants to swap in a fake gateway
#[async_trait]
pub trait PushApi: Send + Sync {
    /// Send a notification
    async fn send(&self, param: &SendParam) -> UpushResult<SendResult>;

    /// Upload device tokens or aliases as a recipient file
    async fn upload(&self, tokens: &[String]) -> UpushResult<UploadResult>;

    /// Base URL requests are sent to
    fn gateway_url(&self) -> &str;
}
