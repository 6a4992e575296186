use crate::domain::payer::PayerId;
use crate::error::{MonetizerError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

pub const SPSP_CONTENT_TYPE: &str = "application/spsp+json";

const ID_PLACEHOLDER: &str = ":id";

/// A fresh receiving address and its shared secret, as produced by the
/// payment transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverAddress {
    pub destination_account: String,
    pub shared_secret: Vec<u8>,
}

impl ReceiverAddress {
    /// Embeds `payer_id` before the last two segments of the address so that
    /// every chunk paid to it can be traced back to the payer.
    pub fn for_payer(&self, payer_id: &PayerId) -> Result<String> {
        let id = payer_id.as_str();
        if id.is_empty() || id.contains('.') {
            return Err(MonetizerError::InvalidPayerId(id.to_string()));
        }

        let segments: Vec<&str> = self.destination_account.split('.').collect();
        if segments.len() < 2 {
            return Err(MonetizerError::TransportError(format!(
                "destination account {:?} has too few segments",
                self.destination_account
            )));
        }

        let (prefix, tail) = segments.split_at(segments.len() - 2);
        let mut parts: Vec<&str> = prefix.to_vec();
        parts.push(id);
        parts.extend_from_slice(tail);
        Ok(parts.join("."))
    }
}

/// Body of the SPSP handshake response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpspResponse {
    pub destination_account: String,
    pub shared_secret: String,
}

impl SpspResponse {
    pub fn new(destination_account: String, shared_secret: &[u8]) -> Self {
        Self {
            destination_account,
            shared_secret: STANDARD.encode(shared_secret),
        }
    }

    pub fn content_type(&self) -> &'static str {
        SPSP_CONTENT_TYPE
    }
}

/// Returns true if an `Accept` header value admits an SPSP response.
pub fn accepts_spsp(accept: Option<&str>) -> bool {
    accept.is_some_and(|value| {
        value
            .split(',')
            .filter_map(|media| media.split(';').next())
            .any(|media| media.trim().eq_ignore_ascii_case(SPSP_CONTENT_TYPE))
    })
}

/// URL template for the per-payer SPSP endpoint, e.g. `/__monetizer/:id`.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointPattern {
    prefix: String,
    suffix: String,
}

impl EndpointPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let (prefix, suffix) = pattern.split_once(ID_PLACEHOLDER).ok_or_else(|| {
            MonetizerError::ConfigError(format!(
                "receiver endpoint pattern {pattern:?} has no {ID_PLACEHOLDER} parameter"
            ))
        })?;
        if suffix.contains(ID_PLACEHOLDER) {
            return Err(MonetizerError::ConfigError(format!(
                "receiver endpoint pattern {pattern:?} has more than one {ID_PLACEHOLDER} parameter"
            )));
        }
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    pub fn render(&self, payer_id: &PayerId) -> String {
        format!("{}{}{}", self.prefix, payer_id, self.suffix)
    }

    /// Recovers the payer id from a request path matching this pattern.
    pub fn match_path(&self, path: &str) -> Option<PayerId> {
        let id = path
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(PayerId::from(id))
    }
}
