//! DialogflowClassifier -- [`IntentClassifier`] backed by the Dialogflow ES REST API.
//!
//! One `detectIntent` call per turn, keyed by project, session, utterance,
//! and a fixed language code. A bearer token is fetched from the
//! [`AccessTokenSource`] for every call, so refreshed credentials take
//! effect without a restart. Tokens stay wrapped in
//! [`secrecy::SecretString`] until the `Authorization` header is built.

use std::time::Duration;

use reqwest::Url;
use secrecy::ExposeSecret;

use relaybot_core::classifier::provider::IntentClassifier;
use relaybot_types::config::ClassifierConfig;
use relaybot_types::error::ClassifierError;
use relaybot_types::intent::IntentMatch;
use relaybot_types::turn::SessionId;

use super::auth::{AccessTokenSource, TokenSource};
use super::types::{DetectIntentRequest, DetectIntentResponse};

/// Settings needed to construct a [`DialogflowClassifier`].
pub struct DialogflowConfig {
    pub project_id: String,
    pub language_code: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl DialogflowConfig {
    /// Build from file/env classifier settings.
    ///
    /// Returns `None` when no project id is configured.
    pub fn from_settings(settings: &ClassifierConfig) -> Option<Self> {
        let project_id = settings.project_id.clone().filter(|p| !p.is_empty())?;
        Some(Self {
            project_id,
            language_code: settings.language_code.clone(),
            base_url: settings.base_url.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}

/// Dialogflow ES intent classifier.
///
/// Intentionally does not derive Debug; the token never reaches logs.
pub struct DialogflowClassifier<T = TokenSource> {
    client: reqwest::Client,
    tokens: T,
    base_url: Url,
    project_id: String,
    language_code: String,
}

impl<T: AccessTokenSource> DialogflowClassifier<T> {
    pub fn new(config: DialogflowConfig, tokens: T) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Unreachable(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClassifierError::InvalidResponse(format!("invalid base url '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            client,
            tokens,
            base_url,
            project_id: config.project_id,
            language_code: config.language_code,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `{base}/v2/projects/{project}/agent/sessions/{session}:detectIntent`,
    /// with project and session percent-encoded as path segments.
    fn detect_intent_url(&self, session_id: &SessionId) -> Result<Url, ClassifierError> {
        let mut url = self.base_url.clone();
        let last = format!("{}:detectIntent", session_id.as_str());
        url.path_segments_mut()
            .map_err(|()| ClassifierError::InvalidResponse("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend([
                "v2",
                "projects",
                self.project_id.as_str(),
                "agent",
                "sessions",
                last.as_str(),
            ]);
        Ok(url)
    }
}

impl<T: AccessTokenSource> IntentClassifier for DialogflowClassifier<T> {
    fn name(&self) -> &str {
        "dialogflow"
    }

    async fn classify(
        &self,
        session_id: &SessionId,
        utterance: &str,
    ) -> Result<IntentMatch, ClassifierError> {
        let url = self.detect_intent_url(session_id)?;
        let body = DetectIntentRequest::text(utterance, &self.language_code);
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Unreachable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = format!("HTTP {status}: {error_body}");
            return Err(if status.is_server_error() || status.as_u16() == 429 {
                ClassifierError::Unreachable(message)
            } else {
                ClassifierError::InvalidResponse(message)
            });
        }

        let parsed: DetectIntentResponse = response.json().await.map_err(|e| {
            ClassifierError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        let result = parsed
            .query_result
            .ok_or_else(|| ClassifierError::InvalidResponse("response has no queryResult".to_string()))?;

        tracing::debug!(
            response_id = parsed.response_id.as_deref().unwrap_or("-"),
            "detectIntent answered"
        );

        Ok(IntentMatch {
            fulfillment_text: result.fulfillment(),
            intent: result.intent.and_then(|i| i.display_name),
            confidence: result.intent_detection_confidence,
        })
    }
}
