//! IntentClassifier trait definition.

use relaybot_types::error::ClassifierError;
use relaybot_types::intent::IntentMatch;
use relaybot_types::turn::SessionId;

/// Trait for intent classification backends (Dialogflow, test doubles, ...).
///
/// Uses native async fn in traits (RPITIT). Implementations must be stateless
/// per call so a single instance can be shared across concurrent turns.
pub trait IntentClassifier: Send + Sync {
    /// Human-readable provider name (e.g., "dialogflow").
    fn name(&self) -> &str;

    /// Classify one raw, untrimmed utterance within a session context.
    fn classify(
        &self,
        session_id: &SessionId,
        utterance: &str,
    ) -> impl std::future::Future<Output = Result<IntentMatch, ClassifierError>> + Send;
}
