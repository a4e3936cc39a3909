use anyhow::{Context, Result, bail};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Everything the model client needs; handed to it at construction.
#[derive(Clone)]
pub struct ModelConfig {
    pub credential: String,
    pub model_name: String,
    pub endpoint: String,
    pub timeout: Duration,
}

// Keeps the credential out of logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("credential", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let Some(credential) = var("GEMINI_API_KEY") else {
            bail!("GEMINI_API_KEY must be set");
        };

        let timeout_secs = match var("LLM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("LLM_TIMEOUT_SECS is not a number of seconds: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_addr}"))?;

        Ok(Config {
            model: ModelConfig {
                credential,
                model_name: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                endpoint: var("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
            bind_addr,
        })
    }
}
