//! Access tokens for the Dialogflow API.
//!
//! A [`TokenSource`] is asked for a token before every `detectIntent` call.
//! Google credentials (a service-account key file, `gcloud` user login, or
//! the metadata server) are handled by `gcp_auth`, which caches the token
//! and mints a new one shortly before it expires. A static bearer token can
//! override all of that for local testing.

use std::path::Path;
use std::sync::Arc;

use gcp_auth::{CustomServiceAccount, TokenProvider};
use secrecy::{ExposeSecret, SecretString};

use relaybot_types::error::ClassifierError;

/// OAuth scope accepted by the Dialogflow ES API.
pub const DIALOGFLOW_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Anything that can hand out a currently valid bearer token.
pub trait AccessTokenSource: Send + Sync {
    fn access_token(
        &self,
    ) -> impl std::future::Future<Output = Result<SecretString, ClassifierError>> + Send;
}

/// Token sources used by the `relaybot` binary.
pub enum TokenSource {
    /// A fixed token, sent as-is until the process restarts.
    Static(SecretString),
    /// Google credentials, refreshed by `gcp_auth`.
    Google(Arc<dyn TokenProvider>),
}

impl TokenSource {
    /// Pick a source in precedence order: explicit token, explicit key file,
    /// then Google's default credential discovery
    /// (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud, metadata server).
    pub async fn resolve(
        static_token: Option<SecretString>,
        key_file: Option<&Path>,
    ) -> Result<Self, ClassifierError> {
        if let Some(token) = static_token {
            tracing::info!("Using static Dialogflow access token");
            return Ok(TokenSource::Static(token));
        }
        if let Some(path) = key_file {
            return Self::from_key_file(path);
        }

        let provider = gcp_auth::provider().await.map_err(|e| {
            ClassifierError::Unreachable(format!("no Google credentials found: {e}"))
        })?;
        tracing::info!("Using Google default credentials");
        Ok(TokenSource::Google(provider))
    }

    /// Load a service-account JSON key.
    pub fn from_key_file(path: &Path) -> Result<Self, ClassifierError> {
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            ClassifierError::InvalidResponse(format!(
                "cannot load service account key {}: {e}",
                path.display()
            ))
        })?;
        tracing::info!(path = %path.display(), "Using service account key");
        Ok(TokenSource::Google(Arc::new(account)))
    }
}

impl AccessTokenSource for TokenSource {
    async fn access_token(&self) -> Result<SecretString, ClassifierError> {
        match self {
            TokenSource::Static(token) => Ok(SecretString::from(token.expose_secret().to_owned())),
            TokenSource::Google(provider) => {
                let token = provider.token(&[DIALOGFLOW_SCOPE]).await.map_err(|e| {
                    ClassifierError::Unreachable(format!("token refresh failed: {e}"))
                })?;
                Ok(SecretString::from(token.as_str().to_owned()))
            }
        }
    }
}
