//! Result of one intent classification.

use serde::{Deserialize, Serialize};

/// The classifier's best match for one utterance.
///
/// `fulfillment_text` is what the relay returns and persists; it is opaque
/// and never inspected. The remaining fields are informational and only
/// used for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub fulfillment_text: String,
    /// Display name of the matched intent, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Detection confidence in `[0.0, 1.0]`, when the provider reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl IntentMatch {
    /// A match carrying only fulfillment text.
    pub fn text(fulfillment_text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: fulfillment_text.into(),
            intent: None,
            confidence: None,
        }
    }
}
