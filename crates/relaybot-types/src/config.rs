//! Configuration types for relaybot.
//!
//! `RelayConfig` represents the optional `relaybot.toml` plus whatever the
//! environment and CLI flags override. All fields have sensible defaults
//! except the classifier project id, which `validate` insists on.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Top-level configuration for the relay service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub classifier: ClassifierConfig,
    pub relay: RelaySettings,
    pub logging: LogConfig,
}

impl RelayConfig {
    /// Check the settings that have no usable default.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.classifier.project_id.as_deref() {
            None | Some("") => return Err(ConfigError::MissingProjectId),
            Some(_) => {}
        }
        if self.classifier.language_code.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "classifier.language_code".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.classifier.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "classifier.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the static web chat surface. Skipped when missing.
    pub web_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            web_dir: "web".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Transcript store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://relaybot.db?mode=rwc".to_string(),
        }
    }
}

/// Intent classifier (Dialogflow ES) settings.
///
/// A static access token is deliberately absent: it only ever comes from
/// the environment or the command line. The service-account key file is
/// only a path, so it may live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub project_id: Option<String>,
    /// Service-account JSON key. Unset means Google default credentials.
    pub credentials_file: Option<String>,
    pub language_code: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            credentials_file: None,
            language_code: "en-US".to_string(),
            base_url: "https://dialogflow.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Relay behaviour settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub store_failure_policy: StoreFailurePolicy,
}

/// What the relay does when classification succeeded but the transcript
/// write failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFailurePolicy {
    /// Fail the whole turn. The exchange is written atomically, so nothing
    /// is persisted.
    #[default]
    FailTurn,
    /// Log the failure and still return the reply.
    BestEffort,
}

impl fmt::Display for StoreFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreFailurePolicy::FailTurn => write!(f, "fail_turn"),
            StoreFailurePolicy::BestEffort => write!(f, "best_effort"),
        }
    }
}

impl FromStr for StoreFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fail_turn" => Ok(StoreFailurePolicy::FailTurn),
            "best_effort" => Ok(StoreFailurePolicy::BestEffort),
            other => Err(format!("invalid store failure policy: '{other}'")),
        }
    }
}

/// Logging settings consumed by relaybot-observe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Bridge spans to OpenTelemetry (stdout exporter).
    pub otel: bool,
}

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("invalid log format: '{other}'")),
        }
    }
}
