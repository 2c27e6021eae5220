use rust_decimal::Decimal;

use crate::models::{PriceRecord, RawPair};

/// Validation and sanity checking for raw pair entries
pub struct RecordValidator {
    /// Upper bound on a plausible USD price, if any
    max_usd_price: Option<Decimal>,
}

impl RecordValidator {
    /// Create a validator that only enforces presence and sign of fields
    pub fn new() -> Self {
        Self { max_usd_price: None }
    }

    /// Create a validator that also rejects prices above `max_usd_price`
    pub fn with_bounds(max_usd_price: Decimal) -> Self {
        Self {
            max_usd_price: Some(max_usd_price),
        }
    }

    /// Validate a single raw entry
    pub fn validate(&self, raw: RawPair) -> Result<PriceRecord, String> {
        let record = PriceRecord::try_from(raw).map_err(|e| e.to_string())?;

        match self.check_bounds(&record) {
            ValidationResult::Valid => Ok(record),
            ValidationResult::Invalid(msg) => Err(msg),
        }
    }

    /// Check if price is within configured bounds
    pub fn check_bounds(&self, record: &PriceRecord) -> ValidationResult {
        match self.max_usd_price {
            Some(max) if record.usd_price > max => ValidationResult::Invalid(format!(
                "Price {} for {} outside reasonable bounds (0-{})",
                record.usd_price, record.pair_label, max
            )),
            _ => ValidationResult::Valid,
        }
    }

    /// Validate a batch, dropping malformed entries instead of failing the whole batch
    pub fn validate_all(&self, raws: Vec<RawPair>) -> (Vec<PriceRecord>, ValidationStats) {
        let mut stats = ValidationStats {
            total: raws.len(),
            ..ValidationStats::default()
        };
        let mut records = Vec::with_capacity(raws.len());

        for (index, raw) in raws.into_iter().enumerate() {
            match self.validate(raw) {
                Ok(record) => {
                    if record.venue().is_none() {
                        stats.unnamed_venues += 1;
                    }
                    stats.accepted += 1;
                    records.push(record);
                }
                Err(reason) => {
                    stats.rejected += 1;
                    log::warn!("Dropping pair entry #{}: {}", index, reason);
                }
            }
        }

        (records, stats)
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

/// Statistics about one validated batch
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub unnamed_venues: usize,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(msg) => Some(msg),
        }
    }
}
