use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Number of random bytes in a freshly issued payer token.
pub const TOKEN_BYTES: usize = 16;

/// Opaque identifier correlating a stream of payments with a balance.
///
/// The ledger never inspects the contents; it is whatever token the session
/// layer handed out (typically a cookie value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayerId(String);

impl PayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Issues an unpredictable token: `TOKEN_BYTES` random bytes, hex encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for PayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
