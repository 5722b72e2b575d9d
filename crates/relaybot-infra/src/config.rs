//! Configuration file loader for relaybot.
//!
//! Reads an optional `relaybot.toml` and deserializes it into
//! [`RelayConfig`]. A missing file means defaults; environment variables and
//! CLI flags are layered on top by the binary.

use std::path::Path;

use relaybot_types::config::RelayConfig;
use relaybot_types::error::ConfigError;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "relaybot.toml";

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`RelayConfig::default()`].
/// - If the file exists but cannot be read or parsed, returns
///   [`ConfigError::File`]. Callers usually log it and fall back to the
///   default, which they can only do once logging is up.
/// - Otherwise returns the parsed config; absent keys keep their defaults.
pub async fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let file_error = |message: String| ConfigError::File {
        path: path.display().to_string(),
        message,
    };

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(RelayConfig::default());
        }
        Err(err) => return Err(file_error(err.to_string())),
    };

    toml::from_str::<RelayConfig>(&content).map_err(|err| file_error(err.to_string()))
}
