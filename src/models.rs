//! Data models and structures
//!
//! Defines the bridge configuration, the inbound request body and the JSON
//! shapes returned to clients.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_HEALTH_MESSAGE: &str = "Gemini bridge running";

/// How the target model is chosen when the caller does not name one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelStrategy {
    /// Always use the configured default model.
    Fixed,
    /// Query the model catalog and pick the newest entry.
    Latest,
}

impl FromStr for ModelStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "latest" => Ok(Self::Latest),
            other => Err(crate::Error::Config(format!(
                "Invalid model strategy '{}'. Expected 'fixed' or 'latest'",
                other
            ))),
        }
    }
}

/// Which generation-config shape is sent upstream and how the reply is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Ask for `image/png` directly and read the first part's inline data.
    Image,
    /// Scan every part for text and inline images.
    Mixed,
}

impl FromStr for GenerationMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "mixed" => Ok(Self::Mixed),
            other => Err(crate::Error::Config(format!(
                "Invalid generation mode '{}'. Expected 'image' or 'mixed'",
                other
            ))),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub base_url: String,
    pub model_strategy: ModelStrategy,
    pub default_model: String,
    pub generation_mode: GenerationMode,
    pub status_check: bool,
    pub health_message: String,
    pub upstream_timeout: Duration,
    pub echo_raw: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            base_url: DEFAULT_BASE_URL.to_string(),
            model_strategy: ModelStrategy::Latest,
            default_model: DEFAULT_MODEL.to_string(),
            generation_mode: GenerationMode::Mixed,
            status_check: true,
            health_message: DEFAULT_HEALTH_MESSAGE.to_string(),
            upstream_timeout: Duration::from_secs(30),
            echo_raw: false,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// An unset `GEMINI_API_KEY` is not an error here; requests report it.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup("BRIDGE_BIND_ADDR") {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|_| {
                crate::Error::Config(format!("Invalid BRIDGE_BIND_ADDR '{}'", raw))
            })?,
            None => defaults.bind_addr,
        };

        let model_strategy = match lookup("BRIDGE_MODEL_STRATEGY") {
            Some(raw) => raw.parse::<ModelStrategy>()?,
            None => defaults.model_strategy,
        };

        let generation_mode = match lookup("BRIDGE_GENERATION_MODE") {
            Some(raw) => raw.parse::<GenerationMode>()?,
            None => defaults.generation_mode,
        };

        let upstream_timeout = match lookup("BRIDGE_UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("Invalid BRIDGE_UPSTREAM_TIMEOUT_SECS '{}'", raw))
            })?),
            None => defaults.upstream_timeout,
        };

        Ok(Self {
            api_key: lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty()),
            bind_addr,
            base_url: lookup("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model_strategy,
            default_model: lookup("BRIDGE_DEFAULT_MODEL").unwrap_or(defaults.default_model),
            generation_mode,
            status_check: parse_flag(&lookup, "BRIDGE_STATUS_CHECK", defaults.status_check)?,
            health_message: lookup("BRIDGE_HEALTH_MESSAGE").unwrap_or(defaults.health_message),
            upstream_timeout,
            echo_raw: parse_flag(&lookup, "BRIDGE_ECHO_RAW", defaults.echo_raw)?,
        })
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> crate::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(crate::Error::Config(format!("Invalid {} '{}'", key, raw))),
        },
    }
}

/// Inbound POST body. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub model: Option<String>,
}

impl GenerateRequest {
    /// The prompt, if it contains anything besides whitespace.
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref().filter(|p| !p.trim().is_empty())
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn model_override(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Generated result relayed to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BridgeResponse {
    Text { text: String },
    Image { image: String },
}

/// Successful POST body: the result plus the model that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    #[serde(flatten)]
    pub content: BridgeResponse,
    pub model_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

/// Body of `GET ?status=1`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    pub current_model: String,
}
