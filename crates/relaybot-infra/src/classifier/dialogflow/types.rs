//! Dialogflow ES `detectIntent` wire types.
//!
//! Only the fields the relay needs are modelled. Dialogflow omits fields
//! holding default values (empty strings, zero confidence), so everything
//! on the response side is optional or defaulted.

use serde::{Deserialize, Serialize};

/// Request body for `projects/{project}/agent/sessions/{session}:detectIntent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentRequest<'a> {
    pub query_input: QueryInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInput<'a> {
    pub text: TextInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput<'a> {
    pub text: &'a str,
    pub language_code: &'a str,
}

impl<'a> DetectIntentRequest<'a> {
    pub fn text(text: &'a str, language_code: &'a str) -> Self {
        Self {
            query_input: QueryInput {
                text: TextInput {
                    text,
                    language_code,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentResponse {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub fulfillment_text: String,
    #[serde(default)]
    pub fulfillment_messages: Vec<FulfillmentMessage>,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub intent_detection_confidence: Option<f32>,
}

impl QueryResult {
    /// The first fulfillment string of the result.
    ///
    /// `fulfillmentText` wins; otherwise the first text of the first text
    /// message; otherwise the empty string.
    pub fn fulfillment(&self) -> String {
        if !self.fulfillment_text.is_empty() {
            return self.fulfillment_text.clone();
        }
        self.fulfillment_messages
            .iter()
            .filter_map(|m| m.text.as_ref())
            .flat_map(|t| t.text.iter())
            .next()
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct FulfillmentMessage {
    #[serde(default)]
    pub text: Option<TextMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TextMessage {
    #[serde(default)]
    pub text: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    #[serde(default)]
    pub display_name: Option<String>,
}
