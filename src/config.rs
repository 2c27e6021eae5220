use anyhow::{Context, Result};
use std::env;

use crate::models::Network;

pub const DEFAULT_MORALIS_API_URL: &str = "https://deep-index.moralis.io/api/v2.2";

#[derive(Debug, Clone)]
pub struct Config {
    pub moralis_api_key: String,
    pub moralis_api_url: String,
    pub token_address: Option<String>,
    pub network: Network,
    pub request_timeout_seconds: u64,
    pub max_retries: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            moralis_api_key: lookup("MORALIS_API_KEY")
                .filter(|key| !key.trim().is_empty())
                .context("MORALIS_API_KEY must be set")?,
            moralis_api_url: var_or("MORALIS_API_URL", DEFAULT_MORALIS_API_URL)
                .trim_end_matches('/')
                .to_string(),
            token_address: lookup("TOKEN_ADDRESS").filter(|addr| !addr.trim().is_empty()),
            network: var_or("NETWORK", "eth")
                .parse()
                .context("Invalid NETWORK")?,
            request_timeout_seconds: var_or("REQUEST_TIMEOUT_SECONDS", "10")
                .parse()
                .context("Invalid REQUEST_TIMEOUT_SECONDS")?,
            max_retries: var_or("MAX_RETRIES", "3")
                .parse()
                .context("Invalid MAX_RETRIES")?,
        })
    }
}
