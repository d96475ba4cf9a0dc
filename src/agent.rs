use crate::content::strip_images;
use crate::history::Session;
use crate::llm::AssistantClient;
use crate::models::chat::{ ConversationId, Turn };

use log::{ info, warn, error };
use serde::{ Deserialize, Serialize };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnState {
    Idle,
    Awaiting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("A reply is still pending for this conversation")]
    Busy,
}

/// Receives a fresh view of the log whenever it changes.
///
/// Called with the controller's transition lock held, so every view arrives in
/// the order the log changed. Implementations must not call back into the
/// controller.
pub trait ConversationObserver: Send + Sync {
    fn conversation_changed(&self, conversation_id: &ConversationId, state: TurnState, turns: &[Turn]);
}

/// A turn whose user message is recorded and whose reply is still owed.
///
/// Dropping it without completing frees the controller for the next submit and
/// tells observers the session is idle again.
pub struct PendingTurn {
    controller: Arc<TurnController>,
    text: String,
    released: bool,
}

impl PendingTurn {
    /// Calls the assistant once and records its answer or the failure.
    pub async fn complete(mut self) {
        let controller = Arc::clone(&self.controller);
        let session = &controller.session;

        let turn = match controller.client.send(session.id(), &self.text).await {
            Ok(reply) => {
                let display_text = strip_images(reply.text.as_deref().unwrap_or(""));
                info!("Reply received for {} (image: {})", session.id(), reply.image_url.is_some());
                Turn::assistant(display_text, reply.image_url)
            }
            Err(e) => {
                error!("Assistant call failed for {}: {}", session.id(), e);
                Turn::assistant_error(e.to_string())
            }
        };

        let _transition = controller.lock_transition();
        session.log().append(turn);
        self.release();
        controller.notify(TurnState::Idle);
    }

    fn release(&mut self) {
        self.controller.in_flight.store(false, Ordering::Release);
        self.released = true;
    }
}

impl Drop for PendingTurn {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!("Pending turn for {} abandoned before a reply", self.controller.session.id());
        let controller = Arc::clone(&self.controller);
        let _transition = controller.lock_transition();
        self.release();
        controller.notify(TurnState::Idle);
    }
}

/// Runs one request/response cycle at a time for a single session.
pub struct TurnController {
    session: Session,
    client: Arc<dyn AssistantClient>,
    in_flight: AtomicBool,
    // held across every state change and the notification describing it
    transition: Mutex<()>,
    observers: Mutex<Vec<Arc<dyn ConversationObserver>>>,
}

impl TurnController {
    pub fn new(session: Session, client: Arc<dyn AssistantClient>) -> Self {
        Self {
            session,
            client,
            in_flight: AtomicBool::new(false),
            transition: Mutex::new(()),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> TurnState {
        if self.in_flight.load(Ordering::Acquire) {
            TurnState::Awaiting
        } else {
            TurnState::Idle
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn ConversationObserver>) {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner).push(observer);
    }

    /// Moves Idle to Awaiting and records the user turn.
    ///
    /// Fails with [`TurnError::Busy`] while another turn is pending; nothing is
    /// recorded in that case.
    pub fn begin(self: &Arc<Self>, text: &str) -> Result<PendingTurn, TurnError> {
        let _transition = self.lock_transition();
        if self.in_flight.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed).is_err() {
            warn!("Rejected submit for {}: reply still pending", self.session.id());
            return Err(TurnError::Busy);
        }
        self.session.log().append(Turn::user(text));
        self.notify(TurnState::Awaiting);
        Ok(PendingTurn {
            controller: Arc::clone(self),
            text: text.to_string(),
            released: false,
        })
    }

    /// One full request/response cycle. Assistant failures never surface here;
    /// they become an error turn.
    pub async fn submit(self: &Arc<Self>, text: &str) -> Result<(), TurnError> {
        self.begin(text)?.complete().await;
        Ok(())
    }

    /// Pushes the current log to every observer without changing it.
    pub fn refresh(&self) {
        let _transition = self.lock_transition();
        self.notify(self.state());
    }

    fn lock_transition(&self) -> MutexGuard<'_, ()> {
        self.transition.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, state: TurnState) {
        let turns = self.session.log().all();
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner).clone();
        for observer in observers {
            observer.conversation_changed(self.session.id(), state, &turns);
        }
    }
}
