use chrono::Utc;
use serde::{ Deserialize, Serialize };
use std::fmt;
use uuid::Uuid;

/// Opaque identifier correlating every turn of one session with the remote assistant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(Uuid);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

pub fn new_conversation_id() -> ConversationId {
    ConversationId::new()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub image_url: Option<String>,
    pub is_error: bool,
    pub timestamp: i64,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            image_url: None,
            is_error: false,
            timestamp: Utc::now().timestamp(),
        }
    }

    pub fn assistant(text: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            image_url,
            is_error: false,
            timestamp: Utc::now().timestamp(),
        }
    }

    /// A failed exchange: plain text, never an image.
    pub fn assistant_error(message: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: message.into(),
            image_url: None,
            is_error: true,
            timestamp: Utc::now().timestamp(),
        }
    }
}
