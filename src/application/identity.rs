use crate::config::{MonetizerConfig, TokenOptions};
use crate::domain::payer::PayerId;
use std::fmt::Write;

/// Hands out payer ids to visitors and renders the cookie that carries them.
#[derive(Debug, Clone)]
pub struct IdentityIssuer {
    token_name: String,
    options: TokenOptions,
}

impl IdentityIssuer {
    pub fn new(token_name: impl Into<String>, options: TokenOptions) -> Self {
        Self {
            token_name: token_name.into(),
            options,
        }
    }

    pub fn from_config(config: &MonetizerConfig) -> Self {
        Self::new(
            config.identity_token_name.clone(),
            config.identity_token_options.clone(),
        )
    }

    pub fn token_name(&self) -> &str {
        &self.token_name
    }

    /// Reuses the visitor's existing token, or issues a fresh one.
    pub fn resolve(&self, existing: Option<&str>) -> PayerId {
        match existing.map(str::trim) {
            Some(token) if !token.is_empty() => PayerId::from(token),
            _ => PayerId::generate(),
        }
    }

    /// `Set-Cookie` header value persisting `payer_id`.
    pub fn set_cookie(&self, payer_id: &PayerId) -> String {
        let mut cookie = format!("{}={}", self.token_name, payer_id);
        let options = &self.options;

        if let Some(path) = &options.path {
            let _ = write!(cookie, "; Path={path}");
        }
        if let Some(domain) = &options.domain {
            let _ = write!(cookie, "; Domain={domain}");
        }
        if let Some(max_age) = options.max_age_secs {
            let _ = write!(cookie, "; Max-Age={max_age}");
        }
        if options.secure {
            cookie.push_str("; Secure");
        }
        if let Some(same_site) = options.same_site {
            let _ = write!(cookie, "; SameSite={}", same_site.as_str());
        }
        cookie
    }
}
