use std::sync::{ PoisonError, RwLock };
use crate::models::chat::{ ConversationId, Role, Turn };

/// Append-only, in-memory log of one conversation's turns.
///
/// Insertion order is display order. Turns are never edited, reordered or
/// removed, so a poisoned lock still holds a consistent prefix of the log and
/// is read through rather than propagated.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: RwLock<Vec<Turn>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, turn: Turn) {
        self.turns.write().unwrap_or_else(PoisonError::into_inner).push(turn);
    }

    /// Snapshot of the full history, oldest first.
    pub fn all(&self) -> Vec<Turn> {
        self.turns.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.turns.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The explicit per-session state: one identifier plus its log.
#[derive(Debug, Default)]
pub struct Session {
    id: ConversationId,
    log: ConversationStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn log(&self) -> &ConversationStore {
        &self.log
    }
}

/// Plain-text transcript of a log, one line per turn.
pub fn format_transcript(turns: &[Turn]) -> String {
    let mut result = String::new();
    for turn in turns {
        let role_display = match (turn.role, turn.is_error) {
            (Role::User, _) => "User",
            (Role::Assistant, false) => "Assistant",
            (Role::Assistant, true) => "Assistant (error)",
        };
        result.push_str(&format!("{}: {}\n", role_display, turn.text));
        if let Some(url) = &turn.image_url {
            result.push_str(&format!("  [image] {}\n", url));
        }
    }
    result
}
