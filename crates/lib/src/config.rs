//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.linebot/config.json`) and environment.
//! The environment variables `ChannelSecret`, `ChannelAccessToken` and `PORT` override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CHANNEL_SECRET_ENV: &str = "ChannelSecret";
pub const CHANNEL_ACCESS_TOKEN_ENV: &str = "ChannelAccessToken";
pub const PORT_ENV: &str = "PORT";
pub const CONFIG_PATH_ENV: &str = "LINEBOT_CONFIG_PATH";

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE channel credentials.
    #[serde(default)]
    pub line: LineConfig,
}

/// Bind address and port for the callback server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port (default 8080). Overridden by PORT env.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; LINE must be able to reach the callback).
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_port() -> u16 {
    8080
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

/// LINE channel config (from the LINE Developers console).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfig {
    /// Used to verify x-line-signature. Overridden by ChannelSecret env.
    pub channel_secret: Option<String>,
    /// Long-lived channel access token. Overridden by ChannelAccessToken env.
    pub channel_access_token: Option<String>,
    /// API base URL (default https://api.line.me).
    pub api_base: Option<String>,
}

/// Non-empty trimmed value of `var`, else the non-empty trimmed configured value.
fn env_or(var: &str, configured: Option<&str>) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the channel secret: env ChannelSecret overrides config.
pub fn resolve_channel_secret(config: &Config) -> Option<String> {
    env_or(CHANNEL_SECRET_ENV, config.line.channel_secret.as_deref())
}

/// Resolve the channel access token: env ChannelAccessToken overrides config.
pub fn resolve_channel_access_token(config: &Config) -> Option<String> {
    env_or(
        CHANNEL_ACCESS_TOKEN_ENV,
        config.line.channel_access_token.as_deref(),
    )
}

/// Resolve the listen port: env PORT overrides config. An unparsable PORT is an error.
pub fn resolve_port(config: &Config) -> Result<u16> {
    port_from(PORT_ENV, config.server.port)
}

fn port_from(var: &str, configured: u16) -> Result<u16> {
    match env_or(var, None) {
        Some(p) => p
            .parse()
            .with_context(|| format!("invalid {} value {:?}", var, p)),
        None => Ok(configured),
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".linebot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, or the default path (or LINEBOT_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
