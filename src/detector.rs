//! Cross-venue spread detection over a batch of price records.
//!
//! Records are bucketed by pair label, each bucket is ranked by USD price and
//! every bucket with at least two named venues yields one opportunity. The
//! functions here are pure: no I/O and no shared state.

use std::collections::BTreeMap;

use crate::models::{ArbitrageOpportunity, PriceRecord};

/// Records sharing a pair label, keyed by that label.
pub type PairGroups<'a> = BTreeMap<&'a str, Vec<&'a PriceRecord>>;

/// Bucket records by pair label, skipping records without a venue name.
pub fn group_by_pair(records: &[PriceRecord]) -> PairGroups<'_> {
    let mut groups: PairGroups<'_> = BTreeMap::new();

    for record in records {
        if record.venue().is_none() {
            log::debug!(
                "Skipping {} at {}: no exchange name",
                record.pair_label,
                record.pair_address
            );
            continue;
        }

        groups
            .entry(record.pair_label.as_str())
            .or_default()
            .push(record);
    }

    groups
}

/// Rank each group by price and report the extremes of every group with two
/// or more records. Output is ordered by pair label.
pub fn rank_and_detect(groups: PairGroups<'_>) -> Vec<ArbitrageOpportunity<'_>> {
    let mut opportunities = Vec::with_capacity(groups.len());

    for (pair_label, mut exchanges) in groups {
        // stable, so equal prices keep input order
        exchanges.sort_by(|a, b| b.usd_price.cmp(&a.usd_price));

        if exchanges.len() < 2 {
            continue;
        }
        let highest = exchanges[0];
        let lowest = exchanges[exchanges.len() - 1];

        opportunities.push(ArbitrageOpportunity {
            pair_label,
            highest,
            lowest,
            spread: highest.usd_price - lowest.usd_price,
        });
    }

    opportunities
}

/// Group and rank in one step.
pub fn detect_opportunities(records: &[PriceRecord]) -> Vec<ArbitrageOpportunity<'_>> {
    rank_and_detect(group_by_pair(records))
}
