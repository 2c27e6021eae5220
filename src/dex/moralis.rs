use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use super::PairSource;
use crate::config::Config;
use crate::models::{Network, RawPair};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pairs API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode pairs response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SourceError {
    /// Transport failures, rate limiting and server errors are worth another try.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Http(_) => true,
            SourceError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            SourceError::Decode(_) => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pairs: Vec<Value>,
}

/// Client for the Moralis token-pairs endpoint.
pub struct MoralisClient {
    api_url: String,
    api_key: String,
    max_retries: usize,
    client: reqwest::Client,
}

impl MoralisClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_url: config.moralis_api_url.clone(),
            api_key: config.moralis_api_key.clone(),
            max_retries: config.max_retries,
            client,
        })
    }

    pub fn pairs_url(&self, token_address: &str) -> String {
        format!("{}/erc20/{}/pairs", self.api_url, token_address)
    }

    async fn request_pairs(&self, url: &str, network: Network) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url)
            .query(&[("chain", network.chain_id())])
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Status { status, body });
        }

        Ok(body)
    }
}

/// Decode a pairs response, keeping every entry that deserializes on its own.
pub fn parse_pairs_response(body: &str) -> Result<Vec<RawPair>, SourceError> {
    let response: PairsResponse = serde_json::from_str(body)?;

    let mut pairs = Vec::with_capacity(response.pairs.len());
    for (index, entry) in response.pairs.into_iter().enumerate() {
        match serde_json::from_value::<RawPair>(entry) {
            Ok(pair) => pairs.push(pair),
            Err(e) => log::warn!("Skipping undecodable pair entry #{}: {}", index, e),
        }
    }

    Ok(pairs)
}

#[async_trait]
impl PairSource for MoralisClient {
    async fn fetch_pairs(&self, token_address: &str, network: Network) -> Result<Vec<RawPair>> {
        let url = self.pairs_url(token_address);
        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(self.max_retries);

        log::debug!("Fetching pairs from {} (chain={})", url, network.chain_id());

        let body = RetryIf::spawn(
            strategy,
            || self.request_pairs(&url, network),
            |e: &SourceError| {
                let retry = e.is_transient();
                if retry {
                    log::warn!("Pairs request failed, retrying: {}", e);
                }
                retry
            },
        )
        .await
        .with_context(|| format!("Failed to fetch pairs for {} on {}", token_address, network))?;

        let pairs = parse_pairs_response(&body)?;
        log::info!("{} returned {} pairs for {}", network, pairs.len(), token_address);
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn config() -> Config {
        Config {
            moralis_api_key: "key".to_string(),
            moralis_api_url: "https://deep-index.moralis.io/api/v2.2".to_string(),
            token_address: None,
            network: Network::Ethereum,
            request_timeout_seconds: 5,
            max_retries: 1,
        }
    }

    #[test]
    fn test_pairs_url() {
        let client = MoralisClient::new(&config()).unwrap();
        assert_eq!(
            client.pairs_url("0xabc"),
            "https://deep-index.moralis.io/api/v2.2/erc20/0xabc/pairs"
        );
    }

    #[test]
    fn test_parse_pairs_response() {
        let body = r#"{
            "page_size": 50,
            "cursor": null,
            "pairs": [
                {
                    "exchange_name": "Uniswap v3",
                    "pair_label": "WETH/USDC",
                    "pair_address": "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640",
                    "usd_price": 2431.5,
                    "liquidity_usd": 178932145.25
                },
                {
                    "exchange_name": "Sushiswap",
                    "pair_label": "WETH/USDC",
                    "pair_address": "0x397ff1542f962076d0bfe58ea045ffa2d347aca0",
                    "usd_price": "not a number",
                    "liquidity_usd": 1000
                },
                {
                    "pair_label": "WETH/DAI",
                    "pair_address": "0xc3d03e4f041fd4cd388c549ee2a29a9e5075882f",
                    "usd_price": 2430,
                    "liquidity_usd": null
                }
            ]
        }"#;

        let pairs = parse_pairs_response(body).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].exchange_name.as_deref(), Some("Uniswap v3"));
        assert_eq!(pairs[0].usd_price, Some(dec!(2431.5)));
        assert_eq!(pairs[1].pair_label.as_deref(), Some("WETH/DAI"));
        assert_eq!(pairs[1].liquidity_usd, None);
    }

    #[test]
    fn test_parse_missing_pairs_field() {
        assert!(parse_pairs_response("{}").unwrap().is_empty());
        assert!(parse_pairs_response("<html>").is_err());
    }

    #[test]
    fn test_transient_errors() {
        let status = |code: u16| SourceError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: String::new(),
        };

        assert!(status(429).is_transient());
        assert!(status(503).is_transient());
        assert!(!status(401).is_transient());
        assert!(!status(404).is_transient());

        let decode = serde_json::from_str::<Value>("{").unwrap_err();
        assert!(!SourceError::Decode(decode).is_transient());
    }
}
