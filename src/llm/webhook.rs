use async_trait::async_trait;
use log::{ debug, info };
use reqwest::Client as HttpClient;
use reqwest::header::{ AUTHORIZATION, CONTENT_TYPE };
use serde::Serialize;
use super::normalize::normalize_body;
use super::{ AssistantClient, AssistantError, NormalizedReply };
use crate::config::AssistantConfig;
use crate::models::chat::ConversationId;

/// Posts each turn to the configured webhook with a static bearer credential.
pub struct WebhookClient {
    http: HttpClient,
    webhook_url: String,
    bearer_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    session_id: String,
    chat_input: &'a str,
}

impl WebhookClient {
    pub fn new(webhook_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            webhook_url: webhook_url.into(),
            bearer_token: bearer_token.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.webhook_url.as_str(), config.bearer_token.clone())
    }

    async fn post(&self, req: &ChatRequest<'_>) -> Result<String, AssistantError> {
        let resp = self.http
            .post(&self.webhook_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.bearer_token))
            .header(CONTENT_TYPE, "application/json")
            .json(req)
            .send().await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl AssistantClient for WebhookClient {
    async fn send(
        &self,
        conversation_id: &ConversationId,
        user_text: &str
    ) -> Result<NormalizedReply, AssistantError> {
        let req = ChatRequest {
            session_id: conversation_id.to_string(),
            chat_input: user_text,
        };
        info!("Sending turn for conversation {} to webhook", req.session_id);
        let body = self.post(&req).await?;
        debug!("Webhook replied with {} bytes for {}", body.len(), req.session_id);
        normalize_body(&body)
    }
}
