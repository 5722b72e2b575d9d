//! BoxIntentClassifier -- object-safe dynamic dispatch wrapper for IntentClassifier.
//!
//! 1. Define an object-safe `IntentClassifierDyn` trait with boxed futures
//! 2. Blanket-impl `IntentClassifierDyn` for all `T: IntentClassifier`
//! 3. `BoxIntentClassifier` wraps `Box<dyn IntentClassifierDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use relaybot_types::error::ClassifierError;
use relaybot_types::intent::IntentMatch;
use relaybot_types::turn::SessionId;

use super::provider::IntentClassifier;

/// Object-safe version of [`IntentClassifier`] with boxed futures.
pub trait IntentClassifierDyn: Send + Sync {
    fn name(&self) -> &str;

    fn classify_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        utterance: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IntentMatch, ClassifierError>> + Send + 'a>>;
}

impl<T: IntentClassifier> IntentClassifierDyn for T {
    fn name(&self) -> &str {
        IntentClassifier::name(self)
    }

    fn classify_boxed<'a>(
        &'a self,
        session_id: &'a SessionId,
        utterance: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<IntentMatch, ClassifierError>> + Send + 'a>> {
        Box::pin(self.classify(session_id, utterance))
    }
}

/// Type-erased intent classifier for runtime provider selection.
///
/// Since `IntentClassifier` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxIntentClassifier` provides the same methods, delegating to
/// the inner `IntentClassifierDyn` trait object.
pub struct BoxIntentClassifier {
    inner: Box<dyn IntentClassifierDyn + Send + Sync>,
}

impl BoxIntentClassifier {
    /// Wrap a concrete `IntentClassifier` in a type-erased box.
    pub fn new<T: IntentClassifier + 'static>(classifier: T) -> Self {
        Self {
            inner: Box::new(classifier),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn classify(
        &self,
        session_id: &SessionId,
        utterance: &str,
    ) -> Result<IntentMatch, ClassifierError> {
        self.inner.classify_boxed(session_id, utterance).await
    }
}
