use serde::{Deserialize, Serialize};

use super::common::{deserialize_opt_code, vendor_failure, ApiResult, RetCode};
use crate::errors::{UpushError, UpushResult};

/// Upload of a batch recipient file.
///
/// The gateway keeps the file for two months; the returned `file_id` can be
/// reused for filecast and alias casts within that window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadParam {
    /// Device tokens or aliases, one per line
    pub content: String,
}

impl UploadParam {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Join tokens or aliases with `\n`
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = tokens
            .into_iter()
            .map(|t| t.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        Self { content }
    }

    pub fn validate(&self) -> UpushResult<()> {
        if self.content.trim().is_empty() {
            return Err(UpushError::invalid_request("content", "must not be empty"));
        }
        Ok(())
    }

    pub(crate) fn to_body<'a>(&'a self, app_key: &'a str, timestamp: String) -> UploadBody<'a> {
        UploadBody {
            appkey: app_key,
            timestamp,
            content: &self.content,
        }
    }
}

/// JSON body of `POST /upload`
#[derive(Debug, Serialize)]
pub(crate) struct UploadBody<'a> {
    pub appkey: &'a str,
    pub timestamp: String,
    pub content: &'a str,
}

/// Response of `POST /upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub ret: RetCode,
    #[serde(default)]
    pub data: UploadData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_opt_code"
    )]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl ApiResult for UploadResult {
    fn is_success(&self) -> bool {
        self.ret == RetCode::Success
    }

    fn to_error(&self) -> Option<UpushError> {
        vendor_failure(
            self.ret,
            self.data.error_code.as_deref(),
            self.data.error_msg.as_deref(),
        )
    }
}
