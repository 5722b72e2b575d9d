//! Conversation relay orchestrating one user turn.
//!
//! `ConversationRelay` validates the request, asks the intent classifier for
//! a fulfillment, persists the user and bot turns as one exchange, and hands
//! the fulfillment back. Ordering matters: nothing is written unless
//! classification succeeded.

use tracing::{Instrument, info, info_span, warn};

use relaybot_types::config::StoreFailurePolicy;
use relaybot_types::error::RelayError;
use relaybot_types::turn::{NewTurn, SessionId};

use crate::classifier::box_classifier::BoxIntentClassifier;
use crate::transcript::store::TranscriptStore;

/// Relays user turns to the intent classifier and logs the exchange.
///
/// Generic over `TranscriptStore` to keep relaybot-core free of
/// infrastructure; the classifier is type-erased so providers can be
/// swapped at runtime.
pub struct ConversationRelay<S: TranscriptStore> {
    store: S,
    classifier: BoxIntentClassifier,
    policy: StoreFailurePolicy,
}

impl<S: TranscriptStore> ConversationRelay<S> {
    pub fn new(store: S, classifier: BoxIntentClassifier, policy: StoreFailurePolicy) -> Self {
        Self {
            store,
            classifier,
            policy,
        }
    }

    /// Access the transcript store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn policy(&self) -> StoreFailurePolicy {
        self.policy
    }

    /// Handle one user turn and return the bot's reply.
    ///
    /// 1. Both `session_id` and `message` must be non-empty, otherwise
    ///    `InvalidRequest` with no side effects. `message` is not trimmed.
    /// 2. Classification failure yields `ClassifierFailed`; nothing is written.
    /// 3. The user and bot turns are appended in one atomic exchange.
    /// 4. The fulfillment text is returned unchanged.
    ///
    /// A store failure in step 3 either fails the turn (`FailTurn`) or is
    /// logged while the reply is still returned (`BestEffort`).
    pub async fn handle_turn(&self, session_id: &str, message: &str) -> Result<String, RelayError> {
        if message.is_empty() {
            return Err(RelayError::InvalidRequest(
                "message must not be empty".to_string(),
            ));
        }
        let session_id = SessionId::new(session_id)?;

        let span = info_span!(
            "relay.turn",
            session_id = %session_id,
            classifier = self.classifier.name(),
        );

        self.relay(session_id, message).instrument(span).await
    }

    async fn relay(&self, session_id: SessionId, message: &str) -> Result<String, RelayError> {
        let matched = match self.classifier.classify(&session_id, message).await {
            Ok(matched) => matched,
            Err(e) => {
                warn!(error = %e, "Classification failed, turn aborted");
                return Err(e.into());
            }
        };

        info!(
            intent = matched.intent.as_deref().unwrap_or("-"),
            confidence = ?matched.confidence,
            "Utterance classified"
        );

        let reply = matched.fulfillment_text;
        let exchange = self
            .store
            .append_exchange(
                NewTurn::user(session_id.clone(), message),
                NewTurn::bot(session_id, reply.clone()),
            )
            .await;

        match exchange {
            Ok((user, bot)) => {
                info!(user_turn = %user.id, bot_turn = %bot.id, "Exchange logged");
                Ok(reply)
            }
            Err(e) => match self.policy {
                StoreFailurePolicy::FailTurn => {
                    warn!(error = %e, "Transcript write failed, turn failed");
                    Err(e.into())
                }
                StoreFailurePolicy::BestEffort => {
                    warn!(error = %e, "Transcript write failed, reply returned unlogged");
                    Ok(reply)
                }
            },
        }
    }
}
