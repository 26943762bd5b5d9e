//! Gateway clients
//!
//! - **RawClient**: one signed request/response cycle per call, taking fully
//!   built [`SendParam`](crate::models::SendParam) / [`UploadParam`](crate::models::UploadParam) values
//! - **Client**: async convenience methods per cast type
//! - **BlockingClient**: synchronous wrapper around `Client`
//! - **PushApi**: trait seam implemented by `Client`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use upush::clients::Client;
//! use upush::models::{IosPayload, SendOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), upush::UpushError> {
//! let client = Client::new("app-key", "app-master-secret")?;
//!
//! let upload = client.upload(["token-a", "token-b"]).await?;
//! let file_id = upload.data.file_id.unwrap_or_default();
//!
//! let result = client
//!     .send_filecast(file_id, IosPayload::alert("Hello", "World"), SendOptions::default())
//!     .await?;
//! println!("task id: {:?}", result.data.task_id);
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod raw;
pub mod traits;

pub use blocking::BlockingClient;
pub use client::Client;
pub use raw::{check_status, RawClient};
pub use traits::PushApi;
