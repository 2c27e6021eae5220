use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chains the pairs API can be queried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[serde(rename = "eth")]
    Ethereum,
    Bsc,
    Polygon,
    Base,
    Optimism,
    Arbitrum,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Ethereum,
        Network::Bsc,
        Network::Polygon,
        Network::Base,
        Network::Optimism,
        Network::Arbitrum,
    ];

    /// Identifier passed as the `chain` query parameter.
    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::Ethereum => "eth",
            Network::Bsc => "bsc",
            Network::Polygon => "polygon",
            Network::Base => "base",
            Network::Optimism => "optimism",
            Network::Arbitrum => "arbitrum",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Network::Ethereum => "Ethereum",
            Network::Bsc => "Binance Smart Chain",
            Network::Polygon => "Polygon",
            Network::Base => "Base",
            Network::Optimism => "Optimism",
            Network::Arbitrum => "Arbitrum",
        }
    }

    /// Base URL that an address is appended to for a block-explorer link.
    pub fn explorer_base_url(&self) -> &'static str {
        match self {
            Network::Ethereum => "https://etherscan.io/address/",
            Network::Bsc => "https://bscscan.com/address/",
            Network::Polygon => "https://polygonscan.com/address/",
            Network::Base => "https://basescan.org/address/",
            Network::Optimism => "https://optimistic.etherscan.io/address/",
            Network::Arbitrum => "https://arbiscan.io/address/",
        }
    }

    pub fn explorer_url(&self, address: &str) -> String {
        format!("{}{}", self.explorer_base_url(), address)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported network '{0}' (expected one of: eth, bsc, polygon, base, optimism, arbitrum)")]
pub struct NetworkParseError(pub String);

impl FromStr for Network {
    type Err = NetworkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Network::ALL
            .into_iter()
            .find(|n| {
                n.chain_id().eq_ignore_ascii_case(wanted) || n.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| NetworkParseError(s.to_string()))
    }
}

/// A pair entry as returned by the pairs API, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPair {
    #[serde(default)]
    pub exchange_name: Option<String>,
    #[serde(default)]
    pub pair_label: Option<String>,
    #[serde(default)]
    pub usd_price: Option<Decimal>,
    #[serde(default)]
    pub liquidity_usd: Option<Decimal>,
    #[serde(default)]
    pub pair_address: Option<String>,
}

/// One venue's quote for a trading pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    pub pair_label: String,
    pub exchange_name: Option<String>,
    pub usd_price: Decimal,
    pub liquidity_usd: Decimal,
    pub pair_address: String,
}

impl PriceRecord {
    pub fn new(
        pair_label: impl Into<String>,
        exchange_name: Option<&str>,
        usd_price: Decimal,
        liquidity_usd: Decimal,
        pair_address: impl Into<String>,
    ) -> Self {
        Self {
            pair_label: pair_label.into(),
            exchange_name: exchange_name.filter(|name| !name.is_empty()).map(str::to_string),
            usd_price,
            liquidity_usd,
            pair_address: pair_address.into(),
        }
    }

    /// Venue name, if the record has a usable one.
    pub fn venue(&self) -> Option<&str> {
        self.exchange_name.as_deref().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("negative value for `{field}`: {value}")]
    Negative { field: &'static str, value: Decimal },
}

impl TryFrom<RawPair> for PriceRecord {
    type Error = RecordError;

    fn try_from(raw: RawPair) -> Result<Self, Self::Error> {
        let pair_label = raw.pair_label.ok_or(RecordError::MissingField("pair_label"))?;
        let pair_address = raw.pair_address.ok_or(RecordError::MissingField("pair_address"))?;
        let usd_price = non_negative("usd_price", raw.usd_price)?;
        let liquidity_usd = non_negative("liquidity_usd", raw.liquidity_usd)?;

        Ok(PriceRecord::new(
            pair_label,
            raw.exchange_name.as_deref(),
            usd_price,
            liquidity_usd,
            pair_address,
        ))
    }
}

fn non_negative(field: &'static str, value: Option<Decimal>) -> Result<Decimal, RecordError> {
    let value = value.ok_or(RecordError::MissingField(field))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RecordError::Negative { field, value });
    }
    Ok(value)
}

/// Highest and lowest priced venues for one pair label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageOpportunity<'a> {
    pub pair_label: &'a str,
    pub highest: &'a PriceRecord,
    pub lowest: &'a PriceRecord,
    pub spread: Decimal,
}
