use std::collections::HashMap;
use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::crypto::cipher::decode_key;
use crate::endpoints::Environment;
use crate::validation::validate_required;

pub const MERCHANT_ID_VAR: &str = "YAGOUT_MERCHANT_ID";
pub const MERCHANT_KEY_VAR: &str = "YAGOUT_MERCHANT_KEY";
pub const ENVIRONMENT_VAR: &str = "YAGOUT_ENVIRONMENT";
pub const ACTION_URL_VAR: &str = "YAGOUT_ACTION_URL";
pub const ALLOW_INSECURE_TLS_VAR: &str = "YAGOUT_ALLOW_INSECURE_TLS";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub merchant_id: String,
    /// Base64 of the 32-byte AES key issued by the gateway.
    pub encryption_key: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub action_url_override: Option<String>,
    /// Disables TLS certificate validation. Insecure; off unless explicitly enabled.
    #[serde(default)]
    pub allow_insecure_tls: bool,
}

impl ClientConfig {
    pub fn new(merchant_id: impl Into<String>, encryption_key: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            encryption_key: encryption_key.into(),
            environment: Environment::default(),
            action_url_override: None,
            allow_insecure_tls: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration from a dotenv-format file without touching the process
    /// environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let vars = dotenvy::from_path_iter(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .collect::<Result<HashMap<String, String>, _>>()
            .with_context(|| format!("failed to parse {}", path.display()))?;

        Self::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let merchant_id = lookup(MERCHANT_ID_VAR)
            .with_context(|| format!("{} is required", MERCHANT_ID_VAR))?;
        let encryption_key = lookup(MERCHANT_KEY_VAR)
            .with_context(|| format!("{} is required", MERCHANT_KEY_VAR))?;

        let environment = match lookup(ENVIRONMENT_VAR) {
            Some(raw) => raw
                .parse::<Environment>()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("invalid {}", ENVIRONMENT_VAR))?,
            None => Environment::default(),
        };

        let allow_insecure_tls = match lookup(ALLOW_INSECURE_TLS_VAR) {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("invalid {}: '{}'", ALLOW_INSECURE_TLS_VAR, raw))?,
            None => false,
        };

        let action_url_override = lookup(ACTION_URL_VAR).filter(|url| !url.trim().is_empty());

        let config = ClientConfig {
            merchant_id,
            encryption_key,
            environment,
            action_url_override,
            allow_insecure_tls,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_required("merchant_id", &self.merchant_id)?;
        decode_key(&self.encryption_key).context("invalid encryption key")?;
        if let Some(url) = &self.action_url_override {
            url::Url::parse(url).with_context(|| format!("invalid action URL '{}'", url))?;
        }
        Ok(())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" | "" => Some(false),
        _ => None,
    }
}
