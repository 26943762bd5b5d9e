//! Umeng Push Client Library
//!
//! Builds signed requests for the Umeng push gateway (unicast, listcast,
//! filecast, broadcast, groupcast and alias casts, plus recipient file
//! uploads) and decodes the gateway's JSON responses into typed results.

pub mod clients;
pub mod config;
pub mod errors;
pub mod models;
pub mod sign;

// Re-export commonly used types for convenience
pub use clients::{BlockingClient, Client, PushApi, RawClient};
pub use config::ClientConfig;
pub use errors::{UpushError, UpushResult};
pub use models::{ApiResult, CastTarget, Payload, SendOptions, SendParam, SendResult, UploadResult};
pub use sign::sign;
