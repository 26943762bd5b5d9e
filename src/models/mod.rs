//! Request and response shapes for the gateway's JSON API

pub mod common;
pub mod payload;
pub mod send;
pub mod upload;

pub use common::{unix_timestamp, ApiResult, RetCode};
pub use payload::{AfterOpen, AndroidBody, AndroidPayload, Aps, DisplayType, IosAlert, IosPayload, Payload};
pub use send::{
    AliasSelector, CastTarget, ReceiptType, SendData, SendOptions, SendParam, SendPolicy,
    SendResult, SendType, MAX_INLINE_TARGETS,
};
pub use upload::{UploadData, UploadParam, UploadResult};
