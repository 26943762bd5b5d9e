//! Request signing
//!
//! The gateway authenticates each call with an MD5 digest over the HTTP
//! method, the full endpoint URL (without query), the raw JSON body and the
//! application master secret, concatenated in that order with no separators.

use md5::{Digest, Md5};

/// Compute the `sign` query parameter for a request.
///
/// Returns 32 lowercase hex characters.
pub fn sign(method: &str, url: &str, body: &[u8], app_master_secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(method.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(body);
    hasher.update(app_master_secret.as_bytes());
    hex::encode(hasher.finalize())
}
