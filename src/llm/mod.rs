pub mod normalize;
pub mod webhook;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use crate::config::AssistantConfig;
use crate::models::chat::ConversationId;
use self::webhook::WebhookClient;

/// Canonical reply shape, whatever the endpoint actually returned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedReply {
    pub text: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("Error: Failed to connect to the LLM - {0}")]
    Transport(String),
    #[error("Error: Malformed reply from the LLM - {0}")]
    MalformedReply(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// One attempt; no retry.
    async fn send(
        &self,
        conversation_id: &ConversationId,
        user_text: &str
    ) -> Result<NormalizedReply, AssistantError>;
}

pub fn new_client(config: &AssistantConfig) -> Arc<dyn AssistantClient> {
    Arc::new(WebhookClient::from_config(config))
}
