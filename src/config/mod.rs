pub mod title;

use thiserror::Error;
use url::Url;
use crate::cli::Args;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required but was not set")]
    Missing(&'static str),
    #[error("WEBHOOK_URL '{url}' is not a valid http(s) URL: {reason}")]
    InvalidUrl {
        url: String,
        reason: String,
    },
}

/// Everything the assistant client needs, checked once at startup.
#[derive(Clone)]
pub struct AssistantConfig {
    pub webhook_url: Url,
    pub bearer_token: String,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("webhook_url", &self.webhook_url.as_str())
            .field("bearer_token", &"<redacted>")
            .finish()
    }
}

impl AssistantConfig {
    pub fn new(webhook_url: Option<&str>, bearer_token: Option<&str>) -> Result<Self, ConfigError> {
        let raw_url = non_empty(webhook_url).ok_or(ConfigError::Missing("WEBHOOK_URL"))?;
        let bearer_token = non_empty(bearer_token).ok_or(ConfigError::Missing("BEARER_TOKEN"))?;

        let webhook_url = Url::parse(raw_url).map_err(|e| ConfigError::InvalidUrl {
            url: raw_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(webhook_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: raw_url.to_string(),
                reason: format!("unsupported scheme '{}'", webhook_url.scheme()),
            });
        }

        Ok(Self {
            webhook_url,
            bearer_token: bearer_token.to_string(),
        })
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        Self::new(args.webhook_url.as_deref(), args.bearer_token.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
