use serde::{ Serialize, Deserialize };
use crate::agent::TurnState;
use crate::models::chat::{ ConversationId, Turn };

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "chat")] Chat {
        content: String,
    },
    #[serde(rename = "history")]
    History,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "welcome", rename_all = "camelCase")] Welcome {
        conversation_id: ConversationId,
        title: String,
    },
    #[serde(rename = "conversation", rename_all = "camelCase")] Conversation {
        conversation_id: ConversationId,
        state: TurnState,
        turns: Vec<Turn>,
    },
    #[serde(rename = "error")] Error {
        message: String,
    },
}
