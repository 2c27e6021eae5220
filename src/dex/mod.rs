use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::models::{Network, RawPair};

pub mod moralis;

/// Supplies the raw pair entries quoted for a token on one network.
#[async_trait]
pub trait PairSource {
    async fn fetch_pairs(&self, token_address: &str, network: Network) -> Result<Vec<RawPair>>;
}

/// Check that `address` is a 0x-prefixed, 20-byte hex address.
pub fn validate_token_address(address: &str) -> Result<()> {
    let Some(digits) = address.strip_prefix("0x").or_else(|| address.strip_prefix("0X")) else {
        bail!("token address '{}' must start with 0x", address);
    };

    match hex::decode(digits) {
        Ok(bytes) if bytes.len() == 20 => Ok(()),
        Ok(bytes) => bail!(
            "token address '{}' is {} bytes long, expected 20",
            address,
            bytes.len()
        ),
        Err(e) => bail!("token address '{}' is not valid hex: {}", address, e),
    }
}
