//! AWS query signature version 2.
//!
//! The signer adds the authentication parameters to a request, sorts all
//! parameters by name, signs
//! `POST\n<host>\n<path>\n<canonical query>` with HMAC-SHA256 and appends
//! the base64 signature as `Signature`.

mod canonical;
mod signer;

pub use canonical::{canonical_query, string_to_sign};
pub use signer::{FormSigner, SignedRequest};

use crate::error::SigningError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

/// Value of `SignatureVersion`.
pub const SIGNATURE_VERSION: &str = "2";

/// Value of `SignatureMethod`.
pub const SIGNATURE_METHOD: &str = "HmacSHA256";

/// Format of `Timestamp`: ISO-8601 UTC with milliseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Parameter names the signer owns.
pub mod param {
    /// Access key identity.
    pub const ACCESS_KEY_ID: &str = "AWSAccessKeyId";
    /// Action name.
    pub const ACTION: &str = "Action";
    /// Session token for temporary credentials.
    pub const SECURITY_TOKEN: &str = "SecurityToken";
    /// Base64 signature.
    pub const SIGNATURE: &str = "Signature";
    /// Signature method.
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    /// Signature version.
    pub const SIGNATURE_VERSION: &str = "SignatureVersion";
    /// Request timestamp.
    pub const TIMESTAMP: &str = "Timestamp";
    /// API version.
    pub const VERSION: &str = "Version";
}

/// Calculate HMAC-SHA256.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SigningError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SigningError::InvalidKey {
        message: e.to_string(),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Format a timestamp for the `Timestamp` parameter.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Source of the current time for request timestamps.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Freeze at the given time.
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(time)
    }

    /// Freeze at an RFC 3339 timestamp such as `2009-11-08T15:54:08.897Z`.
    pub fn from_rfc3339(value: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
