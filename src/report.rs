//! Text and JSON rendering of a scan.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

use crate::models::{ArbitrageOpportunity, Network, PriceRecord};
use crate::price_validator::ValidationStats;
use crate::scanner::Scan;

#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    id: Uuid,
    timestamp: DateTime<Utc>,
    token_address: &'a str,
    network: Network,
    stats: &'a ValidationStats,
    opportunities: Vec<OpportunityView<'a>>,
    pairs: Vec<RecordView<'a>>,
}

#[derive(Debug, Serialize)]
struct OpportunityView<'a> {
    pair_label: &'a str,
    highest: RecordView<'a>,
    lowest: RecordView<'a>,
    spread: Decimal,
}

#[derive(Debug, Serialize)]
struct RecordView<'a> {
    #[serde(flatten)]
    record: &'a PriceRecord,
    explorer_url: String,
}

impl<'a> RecordView<'a> {
    fn new(record: &'a PriceRecord, network: Network) -> Self {
        Self {
            record,
            explorer_url: network.explorer_url(&record.pair_address),
        }
    }
}

pub fn render_json(scan: &Scan) -> Result<String> {
    let report = ScanReport {
        id: scan.id,
        timestamp: scan.timestamp,
        token_address: &scan.token_address,
        network: scan.network,
        stats: &scan.stats,
        opportunities: scan
            .opportunities()
            .into_iter()
            .map(|opp| OpportunityView {
                pair_label: opp.pair_label,
                highest: RecordView::new(opp.highest, scan.network),
                lowest: RecordView::new(opp.lowest, scan.network),
                spread: opp.spread,
            })
            .collect(),
        pairs: scan
            .records
            .iter()
            .map(|record| RecordView::new(record, scan.network))
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render_text(scan: &Scan) -> String {
    let mut out = String::new();
    let opportunities = scan.opportunities();

    let _ = writeln!(
        out,
        "Token {} on {} ({} pairs, scan {})",
        scan.token_address,
        scan.network,
        scan.records.len(),
        scan.id
    );

    if opportunities.is_empty() {
        let _ = writeln!(out, "\nNo arbitrage opportunities found.");
    } else {
        let _ = writeln!(out, "\nArbitrage Opportunities");
        for opportunity in &opportunities {
            write_opportunity(&mut out, opportunity, scan.network);
        }
    }

    if !scan.records.is_empty() {
        let _ = writeln!(out, "\nAll Token Pairs");
        for record in &scan.records {
            let _ = writeln!(out, "\n{}", record.pair_label);
            write_record(&mut out, "Exchange", record, scan.network);
        }
    }

    out
}

fn write_opportunity(out: &mut String, opportunity: &ArbitrageOpportunity<'_>, network: Network) {
    let _ = writeln!(out, "\n{}", opportunity.pair_label);
    write_record(out, "Highest Price Exchange", opportunity.highest, network);
    write_record(out, "Lowest Price Exchange", opportunity.lowest, network);
    let _ = writeln!(out, "  Price Difference: ${}", format_price(opportunity.spread));
}

fn write_record(out: &mut String, heading: &str, record: &PriceRecord, network: Network) {
    let _ = writeln!(out, "  {}: {}", heading, record.venue().unwrap_or("N/A"));
    let _ = writeln!(out, "    Price: ${}", format_price(record.usd_price));
    let _ = writeln!(out, "    Liquidity: ${}", format_usd(record.liquidity_usd));
    let _ = writeln!(
        out,
        "    Pair Address: {} ({})",
        record.pair_address,
        network.explorer_url(&record.pair_address)
    );
}

pub fn format_price(value: Decimal) -> String {
    format!("{:.6}", value.round_dp(6))
}

/// Two decimals with thousands separators, e.g. `1,234,567.89`.
pub fn format_usd(value: Decimal) -> String {
    let formatted = format!("{:.2}", value.abs().round_dp(2));
    let (whole, fraction) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scan(records: Vec<PriceRecord>) -> Scan {
        Scan {
            id: Uuid::nil(),
            timestamp: Utc::now(),
            token_address: "0x7ceb23fd6bc0add59e62ac25578270cff1b9f619".to_string(),
            network: Network::Polygon,
            records,
            stats: ValidationStats::default(),
        }
    }

    fn two_venues() -> Vec<PriceRecord> {
        vec![
            PriceRecord::new("WETH/USDC", Some("QuickSwap"), dec!(2001.123456789), dec!(1234567.891), "0xhigh"),
            PriceRecord::new("WETH/USDC", Some("Sushiswap"), dec!(1995.5), dec!(980), "0xlow"),
            PriceRecord::new("WETH/DAI", None, dec!(2000), dec!(10), "0xnone"),
        ]
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(0)), "0.00");
        assert_eq!(format_usd(dec!(999.999)), "1,000.00");
        assert_eq!(format_usd(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_usd(dec!(100000)), "100,000.00");
        assert_eq!(format_usd(dec!(-4321.5)), "-4,321.50");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(1995.5)), "1995.500000");
        assert_eq!(format_price(dec!(0.0000004)), "0.000000");
        assert_eq!(format_price(dec!(0.00012345678)), "0.000123");
    }

    #[test]
    fn test_text_report() {
        let text = render_text(&scan(two_venues()));

        assert!(text.contains("Arbitrage Opportunities"));
        assert!(text.contains("Highest Price Exchange: QuickSwap"));
        assert!(text.contains("Lowest Price Exchange: Sushiswap"));
        assert!(text.contains("Price: $2001.123457"));
        assert!(text.contains("Liquidity: $1,234,567.89"));
        assert!(text.contains("Price Difference: $5.623457"));
        assert!(text.contains("All Token Pairs"));
        assert!(text.contains("Exchange: N/A"));
    }

    #[test]
    fn test_each_side_links_its_own_address() {
        let text = render_text(&scan(two_venues()));

        let lowest = text
            .split("Lowest Price Exchange")
            .nth(1)
            .and_then(|rest| rest.split("Price Difference").next())
            .unwrap();
        assert!(lowest.contains("https://polygonscan.com/address/0xlow"));
        assert!(!lowest.contains("0xhigh"));
    }

    #[test]
    fn test_text_report_without_opportunities() {
        let text = render_text(&scan(Vec::new()));
        assert!(text.contains("No arbitrage opportunities found."));
        assert!(!text.contains("All Token Pairs"));
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&scan(two_venues())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["network"], "polygon");
        assert_eq!(value["pairs"].as_array().unwrap().len(), 3);

        let opportunities = value["opportunities"].as_array().unwrap();
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0]["pair_label"], "WETH/USDC");
        assert_eq!(opportunities[0]["highest"]["exchange_name"], "QuickSwap");
        assert_eq!(
            opportunities[0]["lowest"]["explorer_url"],
            "https://polygonscan.com/address/0xlow"
        );
        assert_eq!(value["pairs"][2]["exchange_name"], serde_json::Value::Null);
    }
}
