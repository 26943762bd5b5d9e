//! Centralized error handling module
//!
//! Every public operation returns [`UpushResult`]; failures from encoding,
//! transport, decoding and the vendor's own status field each get a distinct
//! variant so callers can match on them.

pub mod types;

pub use types::{UpushError, UpushResult};
