use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{
    deserialize_opt_code, serialize_opt_bool, vendor_failure, ApiResult, RetCode,
};
use super::payload::Payload;
use crate::errors::{UpushError, UpushResult};

/// Upper bound on device tokens or aliases listed inline in one request
pub const MAX_INLINE_TARGETS: usize = 500;

/// Value of the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendType {
    Unicast,
    Listcast,
    Filecast,
    Broadcast,
    Groupcast,
    Customizedcast,
}

/// Recipients of an alias cast
#[derive(Debug, Clone, PartialEq)]
pub enum AliasSelector {
    Aliases(Vec<String>),
    /// File of newline-separated aliases from a previous upload
    FileId(String),
}

/// Who a send request is delivered to.
///
/// Each variant carries exactly the selector its cast type needs.
#[derive(Debug, Clone, PartialEq)]
pub enum CastTarget {
    Unicast { device_token: String },
    Listcast { device_tokens: Vec<String> },
    Filecast { file_id: String },
    Broadcast,
    Groupcast { filter: Value },
    Customizedcast { alias_type: String, aliases: AliasSelector },
}

impl CastTarget {
    pub fn unicast(device_token: impl Into<String>) -> Self {
        CastTarget::Unicast {
            device_token: device_token.into(),
        }
    }

    pub fn listcast<I, S>(device_tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CastTarget::Listcast {
            device_tokens: device_tokens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn filecast(file_id: impl Into<String>) -> Self {
        CastTarget::Filecast {
            file_id: file_id.into(),
        }
    }

    pub fn groupcast(filter: Value) -> Self {
        CastTarget::Groupcast { filter }
    }

    pub fn aliases<I, S>(alias_type: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CastTarget::Customizedcast {
            alias_type: alias_type.into(),
            aliases: AliasSelector::Aliases(aliases.into_iter().map(Into::into).collect()),
        }
    }

    pub fn alias_file(alias_type: impl Into<String>, file_id: impl Into<String>) -> Self {
        CastTarget::Customizedcast {
            alias_type: alias_type.into(),
            aliases: AliasSelector::FileId(file_id.into()),
        }
    }

    pub fn send_type(&self) -> SendType {
        match self {
            CastTarget::Unicast { .. } => SendType::Unicast,
            CastTarget::Listcast { .. } => SendType::Listcast,
            CastTarget::Filecast { .. } => SendType::Filecast,
            CastTarget::Broadcast => SendType::Broadcast,
            CastTarget::Groupcast { .. } => SendType::Groupcast,
            CastTarget::Customizedcast { .. } => SendType::Customizedcast,
        }
    }

    /// Reject selectors the gateway would refuse
    pub fn validate(&self) -> UpushResult<()> {
        match self {
            CastTarget::Unicast { device_token } => single_entry("device_tokens", device_token),
            CastTarget::Listcast { device_tokens } => inline_list("device_tokens", device_tokens),
            CastTarget::Filecast { file_id } => non_empty("file_id", file_id),
            CastTarget::Broadcast => Ok(()),
            CastTarget::Groupcast { filter } => {
                if filter.is_object() {
                    Ok(())
                } else {
                    Err(UpushError::invalid_request("filter", "must be a JSON object"))
                }
            }
            CastTarget::Customizedcast { alias_type, aliases } => {
                non_empty("alias_type", alias_type)?;
                match aliases {
                    AliasSelector::Aliases(list) => inline_list("alias", list),
                    AliasSelector::FileId(file_id) => non_empty("file_id", file_id),
                }
            }
        }
    }
}

fn non_empty(field: &str, value: &str) -> UpushResult<()> {
    if value.trim().is_empty() {
        Err(UpushError::invalid_request(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// A lone token; a comma would turn it into a list on the wire
fn single_entry(field: &str, value: &str) -> UpushResult<()> {
    non_empty(field, value)?;
    if value.contains(',') {
        return Err(UpushError::invalid_request(field, "must not contain commas"));
    }
    Ok(())
}

fn inline_list(field: &str, values: &[String]) -> UpushResult<()> {
    if values.is_empty() {
        return Err(UpushError::invalid_request(field, "must not be empty"));
    }
    if values.len() > MAX_INLINE_TARGETS {
        return Err(UpushError::invalid_request(
            field,
            format!("at most {MAX_INLINE_TARGETS} entries, got {}", values.len()),
        ));
    }
    if values.iter().any(|v| v.trim().is_empty() || v.contains(',')) {
        return Err(UpushError::invalid_request(
            field,
            "entries must be non-empty and contain no commas",
        ));
    }
    Ok(())
}

/// Which delivery receipts the gateway posts back to `receipt_url`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptType {
    #[serde(rename = "1")]
    Received,
    #[serde(rename = "2")]
    Clicked,
    #[serde(rename = "3")]
    Both,
}

/// Scheduling and dedup options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendPolicy {
    /// `yyyy-MM-dd HH:mm:ss`; only honoured for task casts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Defaults to three days after sending on the gateway side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<String>,
    /// Messages per second, minimum 1000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_send_num: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_biz_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns_collapse_id: Option<String>,
}

impl SendPolicy {
    pub const START_TIME_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn with_start_time(mut self, at: chrono::NaiveDateTime) -> Self {
        self.start_time = Some(at.format(Self::START_TIME_FORMAT).to_string());
        self
    }

    pub fn with_expire_time(mut self, at: chrono::NaiveDateTime) -> Self {
        self.expire_time = Some(at.format(Self::START_TIME_FORMAT).to_string());
        self
    }

    pub fn validate(&self) -> UpushResult<()> {
        if let Some(n) = self.max_send_num {
            if n < 1000 {
                return Err(UpushError::invalid_request(
                    "policy.max_send_num",
                    "must be at least 1000",
                ));
            }
        }
        if self.apns_collapse_id.as_ref().is_some_and(|id| id.len() > 64) {
            return Err(UpushError::invalid_request(
                "policy.apns_collapse_id",
                "must not exceed 64 bytes",
            ));
        }
        for (field, value) in [
            ("policy.start_time", &self.start_time),
            ("policy.expire_time", &self.expire_time),
        ] {
            if let Some(value) = value {
                chrono::NaiveDateTime::parse_from_str(value, Self::START_TIME_FORMAT).map_err(
                    |_| UpushError::invalid_request(field, "expected yyyy-MM-dd HH:mm:ss"),
                )?;
            }
        }
        Ok(())
    }
}

/// Optional request fields shared by every cast type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendOptions {
    pub policy: Option<SendPolicy>,
    /// Test mode only applies to broadcast and groupcast
    pub production_mode: Option<bool>,
    pub description: Option<String>,
    /// Route offline MIUI/EMUI/Flyme devices through the vendor channel
    pub mipush: Option<bool>,
    pub mi_activity: Option<String>,
    pub receipt_url: Option<String>,
    pub receipt_type: Option<ReceiptType>,
}

/// A complete send request
#[derive(Debug, Clone, PartialEq)]
pub struct SendParam {
    pub target: CastTarget,
    pub payload: Payload,
    pub options: SendOptions,
}

impl SendParam {
    pub fn new(target: CastTarget, payload: impl Into<Payload>) -> Self {
        Self {
            target,
            payload: payload.into(),
            options: SendOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SendOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, policy: SendPolicy) -> Self {
        self.options.policy = Some(policy);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub fn production_mode(mut self, production: bool) -> Self {
        self.options.production_mode = Some(production);
        self
    }

    pub fn validate(&self) -> UpushResult<()> {
        self.target.validate()?;
        self.payload.validate()?;
        if let Some(policy) = &self.options.policy {
            policy.validate()?;
        }
        if self.options.receipt_url.as_ref().is_some_and(|u| u.len() > 256) {
            return Err(UpushError::invalid_request(
                "receipt_url",
                "must not exceed 256 bytes",
            ));
        }
        Ok(())
    }

    /// Wire body with the caller-independent fields stamped in
    pub(crate) fn to_body<'a>(&'a self, app_key: &'a str, timestamp: String) -> SendBody<'a> {
        let (device_tokens, alias_type, alias, file_id, filter) = match &self.target {
            CastTarget::Unicast { device_token } => (Some(device_token.clone()), None, None, None, None),
            CastTarget::Listcast { device_tokens } => (Some(device_tokens.join(",")), None, None, None, None),
            CastTarget::Filecast { file_id } => (None, None, None, Some(file_id.as_str()), None),
            CastTarget::Broadcast => (None, None, None, None, None),
            CastTarget::Groupcast { filter } => (None, None, None, None, Some(filter)),
            CastTarget::Customizedcast { alias_type, aliases } => match aliases {
                AliasSelector::Aliases(list) => {
                    (None, Some(alias_type.as_str()), Some(list.join(",")), None, None)
                }
                AliasSelector::FileId(file_id) => {
                    (None, Some(alias_type.as_str()), None, Some(file_id.as_str()), None)
                }
            },
        };

        let options = &self.options;
        SendBody {
            appkey: app_key,
            timestamp,
            send_type: self.target.send_type(),
            device_tokens,
            alias_type,
            alias,
            file_id,
            filter,
            payload: &self.payload,
            policy: options.policy.as_ref(),
            production_mode: options.production_mode,
            description: options.description.as_deref(),
            mipush: options.mipush,
            mi_activity: options.mi_activity.as_deref(),
            receipt_url: options.receipt_url.as_deref(),
            receipt_type: options.receipt_type,
        }
    }
}

/// JSON body of `POST /api/send`
#[derive(Debug, Serialize)]
pub(crate) struct SendBody<'a> {
    // Umeng's REST API reference spells it "appkey" for send and upload alike
    pub appkey: &'a str,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub send_type: SendType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_tokens: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a Value>,
    pub payload: &'a Payload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<&'a SendPolicy>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_bool")]
    pub production_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_opt_bool")]
    pub mipush: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mi_activity: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_type: Option<ReceiptType>,
}

/// Response of `POST /api/send`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    pub ret: RetCode,
    #[serde(default)]
    pub data: SendData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendData {
    /// Returned for unicast, listcast and inline-alias casts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<String>,
    /// Returned for task casts: broadcast, groupcast, filecast and file-based alias casts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_opt_code"
    )]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_msg: Option<String>,
}

impl ApiResult for SendResult {
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
