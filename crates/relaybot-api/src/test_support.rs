//! Shared fixtures for the binary's tests.

use relaybot_core::classifier::box_classifier::BoxIntentClassifier;
use relaybot_core::classifier::provider::IntentClassifier;
use relaybot_infra::sqlite::pool::DatabasePool;
use relaybot_types::config::StoreFailurePolicy;
use relaybot_types::error::ClassifierError;
use relaybot_types::intent::IntentMatch;
use relaybot_types::turn::SessionId;

use crate::state::AppState;

/// Classifier that answers every utterance with a fixed reply, or fails.
pub struct FixedClassifier {
    pub reply: Option<String>,
}

impl FixedClassifier {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn unreachable() -> Self {
        Self { reply: None }
    }
}

impl IntentClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn classify(
        &self,
        _session_id: &SessionId,
        _utterance: &str,
    ) -> Result<IntentMatch, ClassifierError> {
        match &self.reply {
            Some(text) => Ok(IntentMatch::text(text.clone())),
            None => Err(ClassifierError::Unreachable("connection refused".into())),
        }
    }
}

/// Classifier that answers `re: <utterance>`, so each reply names its turn.
pub struct EchoClassifier;

impl IntentClassifier for EchoClassifier {
    fn name(&self) -> &str {
        "echo"
    }

    async fn classify(
        &self,
        _session_id: &SessionId,
        utterance: &str,
    ) -> Result<IntentMatch, ClassifierError> {
        tokio::task::yield_now().await;
        Ok(IntentMatch::text(format!("re: {utterance}")))
    }
}

/// Fresh migrated database in a leaked temp dir.
pub async fn test_pool() -> DatabasePool {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    std::mem::forget(dir);
    DatabasePool::new(&url).await.unwrap()
}

pub async fn test_state<C: IntentClassifier + 'static>(
    classifier: C,
    policy: StoreFailurePolicy,
) -> AppState {
    AppState::from_parts(test_pool().await, BoxIntentClassifier::new(classifier), policy)
}
