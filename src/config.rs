use crate::domain::balance::BalanceCap;
use crate::domain::receiver::EndpointPattern;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_TOKEN_NAME: &str = "__monetizer";
pub const DEFAULT_ENDPOINT_PATTERN: &str = "/__monetizer/:id";

/// Settings recognised by the monetizer. Every field has a default, so an
/// empty TOML document is a valid configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonetizerConfig {
    /// Cap on any single payer's balance. Absent means unbounded.
    pub max_balance: Option<u64>,
    /// Name of the persisted identity token (the cookie name).
    pub identity_token_name: String,
    pub identity_token_options: TokenOptions,
    /// Path template of the SPSP endpoint; must contain `:id` once.
    pub receiver_endpoint_pattern: String,
}

/// Attributes of the identity cookie.
///
/// The cookie is never `HttpOnly`: the browser-side payment script reads it.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct TokenOptions {
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age_secs: Option<u64>,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl Default for MonetizerConfig {
    fn default() -> Self {
        Self {
            max_balance: None,
            identity_token_name: DEFAULT_TOKEN_NAME.to_string(),
            identity_token_options: TokenOptions::default(),
            receiver_endpoint_pattern: DEFAULT_ENDPOINT_PATTERN.to_string(),
        }
    }
}

impl MonetizerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.endpoint_pattern().map(|_| ())
    }

    pub fn cap(&self) -> BalanceCap {
        BalanceCap::from(self.max_balance)
    }

    pub fn endpoint_pattern(&self) -> Result<EndpointPattern> {
        EndpointPattern::parse(&self.receiver_endpoint_pattern)
    }
}
