//! Application state wiring the relay to its concrete store and classifier.
//!
//! The relay is generic over its transcript store; AppState pins it to the
//! SQLite implementation and boxes the Dialogflow classifier.

use std::sync::Arc;

use relaybot_core::classifier::box_classifier::BoxIntentClassifier;
use relaybot_core::relay::service::ConversationRelay;
use relaybot_infra::classifier::dialogflow::{DialogflowClassifier, DialogflowConfig, TokenSource};
use relaybot_infra::sqlite::pool::DatabasePool;
use relaybot_infra::sqlite::transcript::SqliteTranscriptStore;
use relaybot_types::config::{RelayConfig, StoreFailurePolicy};
use relaybot_types::error::ConfigError;

/// Relay pinned to the SQLite transcript store.
pub type ConcreteRelay = ConversationRelay<SqliteTranscriptStore>;

/// Shared state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ConcreteRelay>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open the transcript database, run migrations, and build the
    /// Dialogflow-backed relay.
    pub async fn init(config: &RelayConfig, tokens: TokenSource) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database.url).await?;

        let df_config =
            DialogflowConfig::from_settings(&config.classifier).ok_or(ConfigError::MissingProjectId)?;
        let classifier = DialogflowClassifier::new(df_config, tokens)?;
        let project_id = classifier.project_id().to_string();

        let state = Self::from_parts(
            db_pool,
            BoxIntentClassifier::new(classifier),
            config.relay.store_failure_policy,
        );

        tracing::info!(
            classifier = %state.relay.classifier_name(),
            project_id = %project_id,
            language = %config.classifier.language_code,
            policy = %state.relay.policy(),
            "Conversation relay ready"
        );

        Ok(state)
    }

    /// Assemble state from an already-open pool and any classifier.
    pub fn from_parts(
        db_pool: DatabasePool,
        classifier: BoxIntentClassifier,
        policy: StoreFailurePolicy,
    ) -> Self {
        let store = SqliteTranscriptStore::new(db_pool.clone());
        Self {
            relay: Arc::new(ConversationRelay::new(store, classifier, policy)),
            db_pool,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use relaybot_core::transcript::store::TranscriptStore;
    use relaybot_types::turn::{Sender, SessionId};

    use crate::test_support::{EchoClassifier, test_state};

    const SESSIONS: usize = 8;
    const TURNS_PER_SESSION: usize = 8;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_turns_keep_exchanges_paired() {
        let state = test_state(EchoClassifier, StoreFailurePolicy::FailTurn).await;

        let mut handles = Vec::new();
        for s in 0..SESSIONS {
            for t in 0..TURNS_PER_SESSION {
                let relay = state.relay.clone();
                handles.push(tokio::spawn(async move {
                    let session = format!("session-{s}");
                    let message = format!("s{s} t{t}");
                    relay.handle_turn(&session, &message).await
                }));
            }
        }

        let mut failures = 0;
        for handle in handles {
            if handle.await.unwrap().is_err() {
                failures += 1;
            }
        }
        assert_eq!(failures, 0);

        let store = state.relay.store();
        assert_eq!(
            store.count_turns().await.unwrap(),
            (2 * SESSIONS * TURNS_PER_SESSION) as u64
        );

        for s in 0..SESSIONS {
            let session = SessionId::new(format!("session-{s}")).unwrap();
            let conversation = store.conversation(&session).await.unwrap();
            assert_eq!(conversation.len(), 2 * TURNS_PER_SESSION);

            for pair in conversation.turns.chunks(2) {
                assert_eq!(pair[0].sender, Sender::User);
                assert_eq!(pair[1].sender, Sender::Bot);
                assert!(pair[0].message.starts_with(&format!("s{s} ")));
                assert_eq!(pair[1].message, format!("re: {}", pair[0].message));
            }
        }
    }

    #[tokio::test]
    async fn test_from_parts_wires_policy_and_classifier() {
        let state = test_state(EchoClassifier, StoreFailurePolicy::BestEffort).await;
        assert_eq!(state.relay.classifier_name(), "echo");
        assert_eq!(state.relay.policy(), StoreFailurePolicy::BestEffort);
    }
}
