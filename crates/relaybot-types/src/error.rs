use thiserror::Error;

/// Errors from transcript store operations (used by trait definitions in relaybot-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transcript store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt transcript row: {0}")]
    Corrupt(String),
}

/// Errors from the external intent classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier unreachable: {0}")]
    Unreachable(String),

    #[error("invalid classifier response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced by the conversation relay for one turn.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("classification failed: {0}")]
    ClassifierFailed(#[from] ClassifierError),

    #[error("transcript write failed: {0}")]
    StoreWriteFailed(#[from] StoreError),
}

/// Errors from validating the assembled configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no classifier project id configured (set GCLOUD_PROJECT_ID or classifier.project_id)")]
    MissingProjectId,

    #[error(
        "no classifier credentials found (set GOOGLE_APPLICATION_CREDENTIALS or DIALOGFLOW_ACCESS_TOKEN): {0}"
    )]
    MissingCredentials(String),

    #[error("cannot load config file {path}: {message}")]
    File { path: String, message: String },

    #[error("invalid value for {field}: {message}")]
    Invalid { field: String, message: String },
}
