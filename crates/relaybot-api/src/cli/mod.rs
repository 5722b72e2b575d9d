//! CLI command definitions for the `relaybot` binary.
//!
//! Uses clap derive macros. Every serve option can also come from the
//! environment, and any value given here overrides the config file.

pub mod chat;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use secrecy::SecretString;

use relaybot_infra::config::DEFAULT_CONFIG_FILE;
use relaybot_types::config::{LogFormat, RelayConfig, StoreFailurePolicy};

/// Relay chat turns to Dialogflow and keep a transcript.
#[derive(Parser)]
#[command(name = "relaybot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the TOML config file.
    #[arg(long, global = true, env = "RELAYBOT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log output format: pretty, compact or json.
    #[arg(long, global = true, env = "RELAYBOT_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "RELAYBOT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP relay server.
    Serve(ServeArgs),

    /// Chat with a running relay from the terminal.
    Chat {
        /// Base URL of the relay server.
        #[arg(long, default_value = "http://127.0.0.1:5001")]
        url: String,
    },

    /// Create or upgrade the transcript database schema.
    Migrate {
        /// Database URL (defaults to the configured one).
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args, Default)]
pub struct ServeArgs {
    /// Host to bind to.
    #[arg(long, env = "RELAYBOT_HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Dialogflow (Google Cloud) project id.
    #[arg(long, env = "GCLOUD_PROJECT_ID")]
    pub project_id: Option<String>,

    /// Service-account JSON key used to mint Dialogflow tokens.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials: Option<String>,

    /// Fixed OAuth bearer token; overrides any Google credentials.
    #[arg(long, env = "DIALOGFLOW_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    #[arg(long, env = "DIALOGFLOW_LANGUAGE_CODE")]
    pub language_code: Option<String>,

    /// What to do when the transcript cannot be written: fail_turn or best_effort.
    #[arg(long, env = "RELAYBOT_STORE_FAILURE_POLICY")]
    pub store_failure_policy: Option<StoreFailurePolicy>,

    /// Directory holding the static chat page.
    #[arg(long, env = "RELAYBOT_WEB_DIR")]
    pub web_dir: Option<String>,
}

impl ServeArgs {
    /// Overlay every option that was given onto `config`.
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(project_id) = &self.project_id {
            config.classifier.project_id = Some(project_id.clone());
        }
        if let Some(credentials) = &self.credentials {
            config.classifier.credentials_file = Some(credentials.clone());
        }
        if let Some(language_code) = &self.language_code {
            config.classifier.language_code = language_code.clone();
        }
        if let Some(policy) = self.store_failure_policy {
            config.relay.store_failure_policy = policy;
        }
        if let Some(web_dir) = &self.web_dir {
            config.server.web_dir = web_dir.clone();
        }
    }

    /// The access token, if one was given and is non-empty.
    pub fn access_token(&self) -> Option<SecretString> {
        self.access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.to_string()))
    }
}
