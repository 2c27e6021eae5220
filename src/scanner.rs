use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::detector;
use crate::dex::{PairSource, validate_token_address};
use crate::models::{ArbitrageOpportunity, Network, PriceRecord};
use crate::price_validator::{RecordValidator, ValidationStats};

/// Every validated pair record from one fetch.
#[derive(Debug, Clone)]
pub struct Scan {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub token_address: String,
    pub network: Network,
    pub records: Vec<PriceRecord>,
    pub stats: ValidationStats,
}

impl Scan {
    pub fn opportunities(&self) -> Vec<ArbitrageOpportunity<'_>> {
        detector::detect_opportunities(&self.records)
    }
}

pub struct ArbitrageScanner<S> {
    source: S,
    validator: RecordValidator,
}

impl<S: PairSource> ArbitrageScanner<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            validator: RecordValidator::new(),
        }
    }

    pub fn with_validator(source: S, validator: RecordValidator) -> Self {
        Self { source, validator }
    }

    pub async fn scan(&self, token_address: &str, network: Network) -> Result<Scan> {
        validate_token_address(token_address)?;

        log::info!("Fetching all token pair data for {} on {}", token_address, network);
        let raws = self.source.fetch_pairs(token_address, network).await?;

        log::info!("Finding possible arbitrage opportunities...");
        let (records, stats) = self.validator.validate_all(raws);
        log::debug!(
            "Validated {} of {} pairs ({} without exchange name)",
            stats.accepted,
            stats.total,
            stats.unnamed_venues
        );

        let scan = Scan {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            token_address: token_address.to_string(),
            network,
            records,
            stats,
        };

        for opportunity in scan.opportunities() {
            log::info!(
                "Arbitrage opportunity found on {}: {} buy on {} at ${}, sell on {} at ${} (spread ${})",
                network,
                opportunity.pair_label,
                opportunity.lowest.venue().unwrap_or("N/A"),
                opportunity.lowest.usd_price,
                opportunity.highest.venue().unwrap_or("N/A"),
                opportunity.highest.usd_price,
                opportunity.spread
            );
        }

        Ok(scan)
    }
}
